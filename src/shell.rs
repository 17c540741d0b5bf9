//! Terminal front end: an interactive shell over both screens, plus the
//! one-shot renderers used by the subcommands.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use cityweather_ui::view::{render_cities, render_weather};
use cityweather_ui::{AppServices, CitiesTableModel, Route, WeatherPageModel};

const TICK: Duration = Duration::from_millis(50);
const HELP: &str = "Type to search. Commands: /more (or empty line), /clear, /open N, /go PATH, /back, /refresh, /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// New search-box contents
    Input(String),
    /// Empty the search box
    Clear,
    More,
    Open(usize),
    Go(String),
    Back,
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return ShellCommand::More;
        }
        let Some(rest) = line.trim().strip_prefix('/') else {
            return ShellCommand::Input(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match (name, arg) {
            ("more", _) => ShellCommand::More,
            ("clear", _) => ShellCommand::Clear,
            ("open", n) => match n.parse::<usize>() {
                Ok(n) if n > 0 => ShellCommand::Open(n),
                _ => ShellCommand::Unknown(line.to_string()),
            },
            ("go", "") => ShellCommand::Unknown(line.to_string()),
            ("go", path) => ShellCommand::Go(path.to_string()),
            ("back", _) => ShellCommand::Back,
            ("refresh", _) => ShellCommand::Refresh,
            ("help", _) => ShellCommand::Help,
            ("quit" | "exit", _) => ShellCommand::Quit,
            _ => ShellCommand::Unknown(line.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Cities,
    Weather,
}

pub struct Shell {
    screen: Screen,
    table: CitiesTableModel,
    weather: WeatherPageModel,
    notice: Option<String>,
    dirty: bool,
}

impl Shell {
    pub fn new(services: &AppServices) -> Self {
        Self {
            screen: Screen::Cities,
            table: CitiesTableModel::new(services),
            weather: WeatherPageModel::new(services),
            notice: None,
            dirty: true,
        }
    }

    pub fn navigate(&mut self, route: Route) {
        match route {
            Route::Cities => {
                self.screen = Screen::Cities;
                self.table.start();
            }
            Route::Weather { city } => {
                self.screen = Screen::Weather;
                self.weather.open(Some(&city));
            }
            Route::NotFound(path) => {
                self.notice = Some(format!("No page at {path}"));
            }
        }
        self.dirty = true;
    }

    /// Returns false once the user asked to quit
    pub fn handle(&mut self, command: ShellCommand, now: Instant) -> bool {
        self.notice = None;
        match command {
            ShellCommand::Input(text) => {
                if self.screen == Screen::Weather {
                    self.screen = Screen::Cities;
                }
                self.table.on_input(&text, now);
            }
            ShellCommand::Clear => {
                self.screen = Screen::Cities;
                self.table.on_input("", now);
            }
            ShellCommand::More => {
                if self.screen == Screen::Cities && !self.table.load_more() {
                    tracing::debug!("Nothing more to load");
                }
            }
            ShellCommand::Open(n) => match self.table.state().route_for(n - 1) {
                Some(route) => self.navigate(route),
                None => self.notice = Some(format!("No row {n}")),
            },
            ShellCommand::Go(path) => self.navigate(Route::parse(&path)),
            ShellCommand::Back => {
                self.screen = Screen::Cities;
                self.table.start();
            }
            ShellCommand::Refresh => match self.screen {
                Screen::Cities => self.table.refresh(),
                Screen::Weather => self.weather.refresh(),
            },
            ShellCommand::Help => self.notice = Some(HELP.to_string()),
            ShellCommand::Quit => return false,
            ShellCommand::Unknown(line) => {
                self.notice = Some(format!("Unknown command: {line}. {HELP}"));
            }
        }
        self.dirty = true;
        true
    }

    /// Advance timers and fold in finished requests
    pub fn update(&mut self, now: Instant) {
        self.dirty |= self.table.tick(now);
        self.dirty |= self.table.poll_channel();
        self.dirty |= self.weather.poll_channel();
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn render(&self) -> String {
        let mut out = match self.screen {
            Screen::Cities => render_cities(self.table.state(), self.table.input()),
            Screen::Weather => render_weather(self.weather.state()),
        };
        if let Some(notice) = &self.notice {
            out.push_str(notice);
            out.push('\n');
        }
        out
    }
}

/// Interactive loop until `/quit` or end of input
pub fn run(services: &AppServices, initial: Route) -> Result<()> {
    let (tx, rx) = mpsc::channel::<String>();
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("Failed to start input thread")?;

    let mut shell = Shell::new(services);
    shell.navigate(initial);
    println!("{HELP}");

    let stdout = std::io::stdout();
    loop {
        match rx.recv_timeout(TICK) {
            Ok(line) => {
                if !shell.handle(ShellCommand::parse(&line), Instant::now()) {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!("Input closed");
                break;
            }
        }

        shell.update(Instant::now());
        if shell.take_dirty() {
            let mut out = stdout.lock();
            writeln!(out, "\n{}", shell.render())?;
            out.flush()?;
        }
    }
    Ok(())
}

/// Load `pages` pages for `term` and print the table
pub fn print_search(services: &AppServices, term: &str, pages: u32) -> Result<()> {
    let mut table = CitiesTableModel::new(services);
    table.submit(term);
    settle(|| {
        table.poll_channel();
        !table.state().loading()
    });

    for _ in 1..pages {
        if !table.load_more() {
            break;
        }
        settle(|| {
            table.poll_channel();
            !table.state().loading()
        });
    }

    print!("{}", render_cities(table.state(), term));
    match table.state().error_message() {
        Some(error) => bail!("{error}"),
        None => Ok(()),
    }
}

pub fn print_weather(services: &AppServices, city: &str) -> Result<()> {
    let mut page = WeatherPageModel::new(services);
    page.open(Some(city));
    settle(|| {
        page.poll_channel();
        !page.state().loading()
    });

    print!("{}", render_weather(page.state()));
    match page.state().error_message() {
        Some(error) => bail!("{error}"),
        None => Ok(()),
    }
}

pub fn print_route(services: &AppServices, path: &str) -> Result<()> {
    match Route::parse(path) {
        Route::Cities => print_search(services, "", 1),
        Route::Weather { city } => print_weather(services, &city),
        Route::NotFound(path) => bail!("No page at {path}"),
    }
}

fn settle(mut done: impl FnMut() -> bool) {
    while !done() {
        thread::sleep(TICK);
    }
}

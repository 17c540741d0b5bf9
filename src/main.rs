mod cli;
mod shell;

use anyhow::Result;
use clap::Parser;

use cityweather_core::Config;
use cityweather_ui::{AppServices, Route};
use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, validation) = Config::load_validated(cli.config.as_deref())?;
    cityweather_core::init(&config.logging.level)?;
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    let services = AppServices::from_config(&config)?;
    tracing::info!("CityWeather started");

    let result = match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => shell::run(&services, Route::Cities),
        Command::Search { term, pages } => shell::print_search(&services, &term, pages),
        Command::Weather { city } => shell::print_weather(&services, &city),
        Command::Open { path } => shell::print_route(&services, &path),
    };

    // Graceful shutdown
    services.shutdown();
    result
}

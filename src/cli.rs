use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Browse cities and check their current weather")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive city list and weather pages (default)
    Shell,
    /// Print the city table for a search term
    Search {
        term: String,
        /// Number of pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },
    /// Print the weather page for a city
    Weather { city: String },
    /// Render a route such as `/` or `/weather/London`
    Open { path: String },
}

pub mod config;
pub mod error;
pub mod retry;
pub mod units;

pub use config::{
    Config, GeoConfig, LoggingConfig, MapConfig, NetworkConfig, SearchConfig, ValidationResult,
    WeatherConfig,
};
pub use error::{AppError, CitySearchError, ConfigError, NetworkError, WeatherError};
pub use retry::{with_retry, RetryConfig, RetryDecision};
pub use units::{Coordinates, Units};

use anyhow::Result;

/// Initialize logging.
///
/// `RUST_LOG` wins over the configured level. Output goes to stderr so the
/// terminal views on stdout stay readable.
pub fn init(default_level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("CityWeather core initialized");
    Ok(())
}

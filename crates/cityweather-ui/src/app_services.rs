//! Shared services for the view models.
//!
//! Owns the tokio runtime every request runs on, the two API clients and the
//! shutdown token. Clients sit behind `RwLock<Option<..>>` so a screen can be
//! built before (or without) a working client and report that instead of
//! panicking.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use cityweather_core::{Config, RetryConfig};
use cityweather_geo::CitySearchClient;
use cityweather_weather::{MapSettings, WeatherProvider};

/// Knobs the view models read at construction time
#[derive(Debug, Clone)]
pub struct UiSettings {
    pub page_size: u32,
    pub debounce: Duration,
    pub map: MapSettings,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            debounce: Duration::from_millis(300),
            map: MapSettings::default(),
        }
    }
}

pub struct AppServices {
    /// Tokio runtime for async operations
    runtime: tokio::runtime::Runtime,

    /// Cancelled on shutdown; in-flight requests stop reporting back
    shutdown: CancellationToken,

    city_client: RwLock<Option<Arc<CitySearchClient>>>,

    weather_provider: RwLock<Option<Arc<WeatherProvider>>>,

    settings: UiSettings,
}

impl AppServices {
    /// Runtime only, no clients
    pub fn new(settings: UiSettings) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("cityweather-tokio")
            .build()
            .context("Failed to create tokio runtime")?;

        Ok(Self {
            runtime,
            shutdown: CancellationToken::new(),
            city_client: RwLock::new(None),
            weather_provider: RwLock::new(None),
            settings,
        })
    }

    /// Build the runtime and both clients from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = UiSettings {
            page_size: config.geo.page_size,
            debounce: Duration::from_millis(config.search.debounce_ms),
            map: MapSettings {
                tile_url: config.map.tile_url.clone(),
                zoom: config.map.zoom,
                attribution: config.map.attribution.clone(),
            },
        };
        let services = Self::new(settings)?;
        let retry = RetryConfig::with_max_retries(config.network.max_retries);

        let city_client = CitySearchClient::new(
            &config.geo.base_url,
            &config.geo.dataset,
            Duration::from_secs(config.geo.timeout_seconds),
        )
        .context("Failed to create city search client")?
        .with_retry(retry.clone());
        services.set_city_client(Arc::new(city_client));

        if config.weather.api_key.is_none() {
            tracing::warn!("No weather API key configured - weather pages will show an error");
        }

        let provider = WeatherProvider::new(
            &config.weather.base_url,
            config.weather.api_key.clone(),
            config.weather.units,
            Duration::from_secs(config.weather.timeout_seconds),
        )
        .context("Failed to create weather provider")?
        .with_retry(retry);
        services.set_weather_provider(Arc::new(provider));

        tracing::info!("Services initialized");
        Ok(services)
    }

    pub fn handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    pub fn settings(&self) -> &UiSettings {
        &self.settings
    }

    /// Token tied to application shutdown
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    pub fn city_client(&self) -> Option<Arc<CitySearchClient>> {
        self.city_client.read().clone()
    }

    pub fn set_city_client(&self, client: Arc<CitySearchClient>) {
        *self.city_client.write() = Some(client);
    }

    pub fn weather_provider(&self) -> Option<Arc<WeatherProvider>> {
        self.weather_provider.read().clone()
    }

    pub fn set_weather_provider(&self, provider: Arc<WeatherProvider>) {
        *self.weather_provider.write() = Some(provider);
    }

    /// Signal shutdown to all in-flight requests
    pub fn shutdown(&self) {
        tracing::info!("Shutting down services");
        self.shutdown.cancel();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_builds_both_clients() {
        let services = AppServices::from_config(&Config::default()).unwrap();
        assert!(services.city_client().is_some());
        assert!(services.weather_provider().is_some());
        assert_eq!(services.settings().page_size, 20);
        assert_eq!(services.settings().debounce, Duration::from_millis(300));
        assert_eq!(services.settings().map.zoom, 10);
    }

    #[test]
    fn bare_services_have_no_clients() {
        let services = AppServices::new(UiSettings::default()).unwrap();
        assert!(services.city_client().is_none());
        assert!(services.weather_provider().is_none());
    }

    #[test]
    fn shutdown_cancels_child_tokens() {
        let services = AppServices::new(UiSettings::default()).unwrap();
        let token = services.shutdown_token();
        assert!(!token.is_cancelled());
        services.shutdown();
        assert!(token.is_cancelled());
        assert!(services.is_shutting_down());
    }
}

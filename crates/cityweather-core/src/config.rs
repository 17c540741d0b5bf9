use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::units::Units;

/// Environment variable that overrides `weather.api_key`
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// City search dataset settings
    #[serde(default)]
    pub geo: GeoConfig,

    /// Current-weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Search box behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Map rendering on the weather page
    #[serde(default)]
    pub map: MapConfig,

    /// Retry policy shared by both HTTP clients
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// Records search endpoint of the OpenDataSoft API
    #[serde(default = "default_geo_base_url")]
    pub base_url: String,

    /// Dataset identifier passed as `dataset=`
    #[serde(default = "default_geo_dataset")]
    pub dataset: String,

    /// Rows requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_geo_base_url() -> String {
    "https://public.opendatasoft.com/api/records/1.0/search/".to_string()
}

fn default_geo_dataset() -> String {
    "geonames-all-cities-with-a-population-1000".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            base_url: default_geo_base_url(),
            dataset: default_geo_dataset(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Current-weather endpoint
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// OpenWeatherMap API key (can also be set via `OPENWEATHER_API_KEY`)
    pub api_key: Option<String>,

    #[serde(default)]
    pub units: Units,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: None,
            units: Units::Metric,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet time after the last keystroke before a search is issued
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Slippy-map tile template with `{s}`, `{z}`, `{x}` and `{y}` placeholders
    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    #[serde(default = "default_zoom")]
    pub zoom: u8,

    #[serde(default = "default_attribution")]
    pub attribution: String,
}

fn default_tile_url() -> String {
    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}

fn default_zoom() -> u8 {
    10
}

fn default_attribution() -> String {
    "© OpenStreetMap contributors".to_string()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: default_tile_url(),
            zoom: default_zoom(),
            attribution: default_attribution(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Retries for transient failures (timeouts, 5xx, 429). Off by default.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_max_retries() -> u32 {
    0
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist.
    ///
    /// `OPENWEATHER_API_KEY` is applied on top of whatever the file says.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            config
        };

        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Replace the API key with a non-empty override value
    pub fn apply_api_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.weather.api_key = Some(key);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.geo.base_url, "geo.base_url", &mut result);
        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        if self.geo.dataset.trim().is_empty() {
            result.add_error("geo.dataset", "Dataset name cannot be empty");
        }

        if self.geo.page_size == 0 || self.geo.page_size > 100 {
            result.add_error("geo.page_size", "Page size must be between 1 and 100");
        }

        if self.geo.timeout_seconds == 0 {
            result.add_error("geo.timeout_seconds", "Timeout must be greater than 0");
        }
        if self.weather.timeout_seconds == 0 {
            result.add_error("weather.timeout_seconds", "Timeout must be greater than 0");
        }

        match self.weather.api_key.as_deref() {
            None => result.add_warning(
                "weather.api_key",
                format!("No API key configured (set {API_KEY_ENV}) - weather lookups will fail"),
            ),
            Some(key) if key.trim().is_empty() => {
                result.add_error("weather.api_key", "API key cannot be empty if provided")
            }
            Some(_) => {}
        }

        if self.search.debounce_ms == 0 {
            result.add_warning(
                "search.debounce_ms",
                "Debounce disabled - every keystroke issues a request",
            );
        } else if self.search.debounce_ms > 5000 {
            result.add_warning(
                "search.debounce_ms",
                "Debounce is longer than 5 seconds",
            );
        }

        if self.map.zoom > 19 {
            result.add_error("map.zoom", "Zoom must be between 0 and 19");
        }
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.map.tile_url.contains(placeholder) {
                result.add_error(
                    "map.tile_url",
                    format!("Tile URL is missing the {placeholder} placeholder"),
                );
            }
        }

        if self.network.max_retries > 10 {
            result.add_error("network.max_retries", "Max retries cannot exceed 10");
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            result.add_error(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("cityweather");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed() -> Config {
        let mut config = Config::default();
        config.weather.api_key = Some("0123456789abcdef".to_string());
        config
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.geo.page_size, 20);
        assert_eq!(config.geo.dataset, "geonames-all-cities-with-a-population-1000");
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.map.zoom, 10);
        assert_eq!(config.weather.units, Units::Metric);
        assert!(config.weather.api_key.is_none());
        assert_eq!(config.network.max_retries, 0);
    }

    #[test]
    fn test_valid_default_config() {
        let result = Config::default().validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_missing_api_key_is_warning() {
        let result = Config::default().validate();
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));
        assert!(keyed().validate().warnings.is_empty());
    }

    #[test]
    fn test_blank_api_key_is_error() {
        let mut config = Config::default();
        config.weather.api_key = Some("  ".to_string());
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "weather.api_key"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = keyed();
        config.geo.base_url = "ftp://example.com/search".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = keyed();
        config.weather.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "weather.base_url"));
    }

    #[test]
    fn test_page_size_bounds() {
        let mut config = keyed();
        config.geo.page_size = 0;
        assert!(!config.validate().is_valid());
        config.geo.page_size = 101;
        assert!(!config.validate().is_valid());
        config.geo.page_size = 100;
        assert!(config.validate().is_valid());
    }

    #[test]
    fn test_tile_url_placeholders() {
        let mut config = keyed();
        config.map.tile_url = "https://tiles.example.com/{z}/{x}.png".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.message.contains("{y}")));
    }

    #[test]
    fn test_zoom_and_log_level() {
        let mut config = keyed();
        config.map.zoom = 20;
        config.logging.level = "verbose".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "map.zoom"));
        assert!(result.errors.iter().any(|e| e.message.contains("Invalid log level")));
    }

    #[test]
    fn test_debounce_warnings() {
        let mut config = keyed();
        config.search.debounce_ms = 0;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "search.debounce_ms"));
    }

    #[test]
    fn test_api_key_override() {
        let mut config = keyed();
        config.apply_api_key_override(Some(String::new()));
        assert_eq!(config.weather.api_key.as_deref(), Some("0123456789abcdef"));
        config.apply_api_key_override(Some("from-env".to_string()));
        assert_eq!(config.weather.api_key.as_deref(), Some("from-env"));
        config.apply_api_key_override(None);
        assert_eq!(config.weather.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.geo.page_size, 20);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[weather]\nunits = \"imperial\"\n\n[search]\ndebounce_ms = 150\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.units, Units::Imperial);
        assert_eq!(config.search.debounce_ms, 150);
        assert_eq!(config.geo.page_size, 20);
        assert_eq!(config.map.zoom, 10);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[geo\npage_size = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}

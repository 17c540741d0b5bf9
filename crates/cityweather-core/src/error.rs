//! Centralized error types for the CityWeather application.
//!
//! Each client crate keeps its own detailed error enum; the UI layer maps
//! those into this hierarchy so every screen renders messages the same way.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("City search error: {0}")]
    CitySearch(#[from] CitySearchError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::CitySearch(e) => e.user_message(),
        }
    }
}

/// Transport failures (no HTTP response at all).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}

/// Weather service errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("City parameter is missing")]
    MissingCity,

    #[error("Weather API error: {0}")]
    ApiError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limited")]
    RateLimited,

    #[error("Service unavailable")]
    ServiceUnavailable,
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::CityNotFound(_) => "City not found. Check the name and try again.",
            WeatherError::MissingCity => "City parameter is missing",
            WeatherError::ApiError(_) => "Error fetching weather data. Please try again.",
            WeatherError::InvalidApiKey => "Weather API key is invalid. Check settings.",
            WeatherError::RateLimited => "Too many weather requests. Please wait a moment.",
            WeatherError::ServiceUnavailable => {
                "Weather service unavailable. Please try again later."
            }
        }
    }
}

/// City search (geo dataset) errors.
#[derive(Debug, Error)]
pub enum CitySearchError {
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("City search API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Service unavailable")]
    ServiceUnavailable,
}

impl CitySearchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CitySearchError::InvalidQuery(_) => "That search could not be run. Try different words.",
            CitySearchError::ApiError(_) => "Error fetching cities. Please try again.",
            CitySearchError::RateLimited => "Too many searches. Please wait a moment.",
            CitySearchError::ServiceUnavailable => {
                "City search unavailable. Please try again later."
            }
        }
    }
}

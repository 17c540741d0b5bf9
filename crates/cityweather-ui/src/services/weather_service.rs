//! Weather backend: async weather fetching.
//! Network work runs on the shared runtime; results come back via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use cityweather_weather::{CurrentWeather, WeatherProvider};
use tokio_util::sync::CancellationToken;

/// Error type for weather operations
#[derive(Debug, Clone)]
pub enum WeatherError {
    MissingCity,
    MissingApiKey,
    InvalidApiKey,
    CityNotFound(String),
    RateLimited,
    /// Provider answered with an error status or a body we could not read
    Api(String),
    Network(String),
    NotInitialized,
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::MissingCity => write!(f, "City parameter is missing"),
            WeatherError::MissingApiKey => write!(f, "No weather API key configured"),
            WeatherError::InvalidApiKey => write!(f, "Weather API key rejected"),
            WeatherError::CityNotFound(s) => write!(f, "City not found: {}", s),
            WeatherError::RateLimited => write!(f, "Weather provider rate limit reached"),
            WeatherError::Api(s) => write!(f, "Weather API error: {}", s),
            WeatherError::Network(s) => write!(f, "Weather network error: {}", s),
            WeatherError::NotInitialized => write!(f, "Weather service not initialized"),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<cityweather_weather::WeatherError> for WeatherError {
    fn from(e: cityweather_weather::WeatherError) -> Self {
        use cityweather_weather::WeatherError as Provider;
        match e {
            Provider::MissingCity => WeatherError::MissingCity,
            Provider::MissingApiKey => WeatherError::MissingApiKey,
            Provider::InvalidApiKey => WeatherError::InvalidApiKey,
            Provider::CityNotFound(city) => WeatherError::CityNotFound(city),
            Provider::RateLimited => WeatherError::RateLimited,
            Provider::Api(s) | Provider::Parse(s) => WeatherError::Api(s),
            Provider::Network(e) => WeatherError::Network(e.to_string()),
        }
    }
}

/// Messages sent from async operations back to the model
#[derive(Debug)]
pub enum WeatherServiceMessage {
    FetchDone {
        /// Page generation the request was issued under
        generation: u64,
        city: String,
        result: Result<CurrentWeather, WeatherError>,
    },
}

/// Request current weather for `city`.
/// Sends `FetchDone` on the channel unless `cancel` fires first.
pub fn request_fetch(
    tx: &Sender<WeatherServiceMessage>,
    runtime: Option<&tokio::runtime::Handle>,
    provider: Option<Arc<WeatherProvider>>,
    city: String,
    generation: u64,
    cancel: CancellationToken,
) {
    let tx = tx.clone();

    let (runtime, provider) = match (runtime, provider) {
        (Some(r), Some(p)) => (r, p),
        _ => {
            let _ = tx.send(WeatherServiceMessage::FetchDone {
                generation,
                city,
                result: Err(WeatherError::NotInitialized),
            });
            return;
        }
    };

    runtime.spawn(async move {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => None,
            result = provider.fetch_current(&city) => Some(result),
        };

        let Some(result) = outcome else {
            tracing::debug!("Weather fetch for {} cancelled", city);
            return;
        };

        let result = result.map_err(WeatherError::from);
        let _ = tx.send(WeatherServiceMessage::FetchDone {
            generation,
            city,
            result,
        });
    });
}

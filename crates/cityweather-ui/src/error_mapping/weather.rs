use crate::services::WeatherError as UiWeatherError;
use cityweather_core::{AppError, ConfigError, NetworkError, WeatherError};

impl From<UiWeatherError> for AppError {
    fn from(e: UiWeatherError) -> Self {
        match e {
            UiWeatherError::MissingCity => AppError::Weather(WeatherError::MissingCity),
            UiWeatherError::MissingApiKey => {
                AppError::Config(ConfigError::MissingSetting("weather.api_key".to_string()))
            }
            UiWeatherError::InvalidApiKey => AppError::Weather(WeatherError::InvalidApiKey),
            UiWeatherError::CityNotFound(s) => AppError::Weather(WeatherError::CityNotFound(s)),
            UiWeatherError::RateLimited => AppError::Weather(WeatherError::RateLimited),
            UiWeatherError::Api(s) => AppError::Weather(WeatherError::ApiError(s)),
            UiWeatherError::Network(s) => AppError::Network(NetworkError::ConnectionFailed(s)),
            UiWeatherError::NotInitialized => AppError::Weather(WeatherError::ServiceUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_a_config_problem() {
        let app: AppError = UiWeatherError::MissingApiKey.into();
        assert!(matches!(app, AppError::Config(ConfigError::MissingSetting(_))));
    }

    #[test]
    fn transport_and_api_failures_stay_apart() {
        let app: AppError = UiWeatherError::Network("reset".into()).into();
        assert!(matches!(app, AppError::Network(_)));

        let app: AppError = UiWeatherError::Api("500: boom".into()).into();
        assert!(matches!(app, AppError::Weather(WeatherError::ApiError(_))));

        let app: AppError = UiWeatherError::RateLimited.into();
        assert!(matches!(app, AppError::Weather(WeatherError::RateLimited)));
    }

    #[test]
    fn city_not_found_keeps_city() {
        let app: AppError = UiWeatherError::CityNotFound("Atlantis".into()).into();
        assert!(app.to_string().contains("Atlantis"));
    }
}

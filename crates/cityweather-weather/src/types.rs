use chrono::{DateTime, Utc};
use cityweather_core::{Coordinates, Units};
use serde::{Deserialize, Serialize};

const CLOUD_IMAGE: &str =
    "https://res.cloudinary.com/dwwunc51b/image/upload/v1722767300/cloud_eijeb3.png";
const DRIZZLE_IMAGE: &str =
    "https://res.cloudinary.com/dwwunc51b/image/upload/v1722767300/drizzle_maygnu.png";
const SUN_IMAGE: &str =
    "https://res.cloudinary.com/dwwunc51b/image/upload/v1722767300/sun_sscjae.png";

/// Condition group from `weather[0].main`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Haze,
    Drizzle,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Other(String),
}

impl WeatherCondition {
    pub fn from_main(main: &str) -> Self {
        match main {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Haze" => Self::Haze,
            "Drizzle" => Self::Drizzle,
            "Rain" => Self::Rain,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" => Self::Mist,
            "Fog" => Self::Fog,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Haze => "Haze",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Mist => "Mist",
            Self::Fog => "Fog",
            Self::Other(s) => s,
        }
    }

    /// Illustration shown next to the temperature
    pub fn image_url(&self) -> &'static str {
        match self {
            Self::Clouds | Self::Haze => CLOUD_IMAGE,
            Self::Clear => SUN_IMAGE,
            _ => DRIZZLE_IMAGE,
        }
    }

    /// Page background theme
    pub fn theme(&self) -> Theme {
        match self {
            Self::Clouds => Theme::Cloudy,
            Self::Clear => Theme::Clear,
            _ => Theme::Drizzle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Cloudy,
    Drizzle,
    Clear,
}

impl Theme {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cloudy => "cloudy",
            Self::Drizzle => "drizzle",
            Self::Clear => "clear",
        }
    }
}

/// Current conditions for one city
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// City name as resolved by the provider
    pub city_name: String,
    /// ISO country code
    pub country: String,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    /// Raw provider value (m/s for metric and standard, mph for imperial)
    pub wind_speed: f64,
    pub condition: WeatherCondition,
    pub description: String,
    pub coordinates: Option<Coordinates>,
    pub units: Units,
    pub fetched_at: DateTime<Utc>,
}

impl CurrentWeather {
    /// Temperature rounded half-up, matching how the page has always shown it
    pub fn rounded_temperature(&self) -> i64 {
        round_half_up(self.temperature)
    }

    pub fn rounded_feels_like(&self) -> Option<i64> {
        self.feels_like.map(round_half_up)
    }

    /// "London, GB"
    pub fn location_label(&self) -> String {
        if self.country.is_empty() {
            self.city_name.clone()
        } else {
            format!("{}, {}", self.city_name, self.country)
        }
    }

    pub fn wind_display(&self) -> (f64, &'static str) {
        self.units.wind_display(self.wind_speed)
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("City parameter is missing")]
    MissingCity,
    #[error("No weather API key configured")]
    MissingApiKey,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("City not found: {0}")]
    CityNotFound(String),
    #[error("Rate limited by weather provider")]
    RateLimited,
    #[error("API error: {0}")]
    Api(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

// OpenWeatherMap /data/2.5/weather response shapes

#[derive(Debug, Deserialize)]
pub(crate) struct OwmResponse {
    pub coord: Option<OwmCoord>,
    #[serde(default)]
    pub weather: Vec<OwmWeather>,
    pub main: OwmMain,
    pub wind: Option<OwmWind>,
    pub sys: Option<OwmSys>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmCoord {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmWeather {
    pub main: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmMain {
    pub temp: f64,
    pub feels_like: Option<f64>,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmWind {
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmSys {
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmErrorBody {
    pub message: Option<String>,
}

impl OwmResponse {
    pub(crate) fn into_current(self, units: Units) -> Result<CurrentWeather, WeatherError> {
        let first = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("response has no weather entries".to_string()))?;

        Ok(CurrentWeather {
            city_name: self.name,
            country: self.sys.and_then(|s| s.country).unwrap_or_default(),
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            humidity: self.main.humidity,
            wind_speed: self.wind.map(|w| w.speed).unwrap_or_default(),
            condition: WeatherCondition::from_main(&first.main),
            description: first.description,
            coordinates: self.coord.map(|c| Coordinates {
                lat: c.lat,
                lon: c.lon,
            }),
            units,
            fetched_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(temp: f64) -> CurrentWeather {
        CurrentWeather {
            city_name: "London".to_string(),
            country: "GB".to_string(),
            temperature: temp,
            feels_like: None,
            temp_min: temp - 1.0,
            temp_max: temp + 1.0,
            humidity: 80,
            wind_speed: 5.0,
            condition: WeatherCondition::Clouds,
            description: "overcast clouds".to_string(),
            coordinates: None,
            units: Units::Metric,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_condition_parsing() {
        assert_eq!(WeatherCondition::from_main("Clouds"), WeatherCondition::Clouds);
        assert_eq!(WeatherCondition::from_main("Clear"), WeatherCondition::Clear);
        assert_eq!(
            WeatherCondition::from_main("Tornado"),
            WeatherCondition::Other("Tornado".to_string())
        );
        assert_eq!(WeatherCondition::from_main("Tornado").label(), "Tornado");
    }

    #[test]
    fn test_condition_images() {
        assert_eq!(WeatherCondition::Clouds.image_url(), CLOUD_IMAGE);
        assert_eq!(WeatherCondition::Haze.image_url(), CLOUD_IMAGE);
        assert_eq!(WeatherCondition::Clear.image_url(), SUN_IMAGE);
        assert_eq!(WeatherCondition::Drizzle.image_url(), DRIZZLE_IMAGE);
        assert_eq!(WeatherCondition::Snow.image_url(), DRIZZLE_IMAGE);
    }

    #[test]
    fn test_condition_themes() {
        assert_eq!(WeatherCondition::Clouds.theme(), Theme::Cloudy);
        assert_eq!(WeatherCondition::Clear.theme(), Theme::Clear);
        assert_eq!(WeatherCondition::Drizzle.theme(), Theme::Drizzle);
        // Haze gets the cloud picture but the default background
        assert_eq!(WeatherCondition::Haze.theme(), Theme::Drizzle);
        assert_eq!(Theme::Cloudy.name(), "cloudy");
    }

    #[test]
    fn test_rounding_is_half_up() {
        assert_eq!(sample(14.5).rounded_temperature(), 15);
        assert_eq!(sample(14.49).rounded_temperature(), 14);
        assert_eq!(sample(-2.5).rounded_temperature(), -2);
        assert_eq!(sample(-2.6).rounded_temperature(), -3);
    }

    #[test]
    fn test_feels_like_rounding() {
        let mut weather = sample(10.0);
        assert_eq!(weather.rounded_feels_like(), None);
        weather.feels_like = Some(8.5);
        assert_eq!(weather.rounded_feels_like(), Some(9));
    }

    #[test]
    fn test_location_label() {
        let mut weather = sample(10.0);
        assert_eq!(weather.location_label(), "London, GB");
        weather.country.clear();
        assert_eq!(weather.location_label(), "London");
    }

    #[test]
    fn test_response_without_weather_entries_is_parse_error() {
        let raw: OwmResponse = serde_json::from_value(serde_json::json!({
            "weather": [],
            "main": { "temp": 1.0, "temp_min": 0.0, "temp_max": 2.0, "humidity": 50 },
            "name": "Nowhere"
        }))
        .unwrap();

        assert!(matches!(raw.into_current(Units::Metric), Err(WeatherError::Parse(_))));
    }
}

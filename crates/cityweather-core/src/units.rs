//! Value types shared by the city list and the weather page.

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Unit system requested from the weather provider (`units=`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
            Self::Standard => "K",
        }
    }

    /// Convert the provider's wind speed into the unit shown on the page.
    ///
    /// Metric reports arrive in m/s and are shown in km/h.
    pub fn wind_display(&self, speed: f64) -> (f64, &'static str) {
        match self {
            Self::Metric => (speed * 3.6, "km/h"),
            Self::Imperial => (speed, "mph"),
            Self::Standard => (speed, "m/s"),
        }
    }
}

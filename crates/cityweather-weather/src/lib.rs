//! Current weather for a named city via the OpenWeatherMap API,
//! plus the map view derived from the report's coordinates.

pub mod map;
pub mod provider;
pub mod types;

pub use map::{MapSettings, MapView, Marker, TileCoord, TileLayer};
pub use provider::WeatherProvider;
pub use types::*;

pub use cityweather_core::{Coordinates, Units};

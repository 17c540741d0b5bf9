//! City search over the OpenDataSoft geonames dataset.
//!
//! Provides the paginated records client and the city types the list view renders.

pub mod client;
pub mod error;
pub mod types;

pub use client::CitySearchClient;
pub use error::GeoError;
pub use types::{CityRecord, SearchPage, SearchQuery};

pub use cityweather_core::Coordinates;

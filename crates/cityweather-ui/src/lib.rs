pub mod app_services;
pub mod debounce;
pub mod error_mapping;
pub mod models;
pub mod router;
pub mod services;
pub mod view;

pub use app_services::AppServices;
pub use debounce::Debouncer;
pub use models::cities_table::{CitiesTableModel, CitiesTableState, ScrollMetrics};
pub use models::weather_page::{WeatherPageModel, WeatherPageState};
pub use router::Route;

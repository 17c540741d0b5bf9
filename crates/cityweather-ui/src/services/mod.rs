pub mod city_service;
pub mod weather_service;

pub use city_service::{request_search, CityError, CityServiceMessage};
pub use weather_service::{request_fetch, WeatherError, WeatherServiceMessage};

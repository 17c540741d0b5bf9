pub mod cities_table;
pub mod weather_page;

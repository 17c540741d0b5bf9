//! The two screens and the paths that address them.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped in a city path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Cities,
    /// `/weather/:city`; an empty city means the parameter was missing
    Weather { city: String },
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let without_query = trimmed
            .split(&['?', '#'][..])
            .next()
            .unwrap_or_default();

        let segments: Vec<&str> = without_query
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split('/')
            .collect();

        match segments.as_slice() {
            [""] => Route::Cities,
            ["weather"] => Route::Weather {
                city: String::new(),
            },
            ["weather", city] => Route::Weather {
                city: percent_decode_str(city).decode_utf8_lossy().into_owned(),
            },
            _ => Route::NotFound(trimmed.to_string()),
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Cities => "/".to_string(),
            Route::Weather { city } => {
                format!("/weather/{}", utf8_percent_encode(city, PATH_SEGMENT))
            }
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn weather(city: impl Into<String>) -> Self {
        Route::Weather { city: city.into() }
    }
}

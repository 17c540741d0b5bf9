//! City search error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            GeoError::RateLimited(30).to_string(),
            "Rate limited, retry after 30 seconds"
        );
        assert!(GeoError::InvalidQuery("bad field".into()).to_string().contains("bad field"));
    }
}

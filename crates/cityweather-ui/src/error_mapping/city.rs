use crate::services::CityError;
use cityweather_core::{AppError, CitySearchError, NetworkError};

impl From<CityError> for AppError {
    fn from(e: CityError) -> Self {
        match e {
            CityError::Network(s) => AppError::Network(NetworkError::ConnectionFailed(s)),
            CityError::RateLimited(_) => AppError::CitySearch(CitySearchError::RateLimited),
            CityError::InvalidQuery(s) => AppError::CitySearch(CitySearchError::InvalidQuery(s)),
            CityError::Api(s) => AppError::CitySearch(CitySearchError::ApiError(s)),
            CityError::NotInitialized => AppError::CitySearch(CitySearchError::ServiceUnavailable),
        }
    }
}

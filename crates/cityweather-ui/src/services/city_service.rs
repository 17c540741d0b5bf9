//! City search backend: async page fetching.
//! Network work runs on the shared runtime; results come back via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use cityweather_geo::{CitySearchClient, GeoError, SearchPage, SearchQuery};
use tokio_util::sync::CancellationToken;

/// Error type for city search operations
#[derive(Debug, Clone)]
pub enum CityError {
    Network(String),
    RateLimited(u64),
    InvalidQuery(String),
    Api(String),
    NotInitialized,
}

impl std::fmt::Display for CityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CityError::Network(s) => write!(f, "City search network error: {}", s),
            CityError::RateLimited(secs) => write!(f, "City search rate limited for {}s", secs),
            CityError::InvalidQuery(s) => write!(f, "Invalid city search: {}", s),
            CityError::Api(s) => write!(f, "City search error: {}", s),
            CityError::NotInitialized => write!(f, "City search service not initialized"),
        }
    }
}

impl std::error::Error for CityError {}

impl From<GeoError> for CityError {
    fn from(e: GeoError) -> Self {
        match e {
            GeoError::NetworkError(e) => CityError::Network(e.to_string()),
            GeoError::RateLimited(secs) => CityError::RateLimited(secs),
            GeoError::InvalidQuery(s) => CityError::InvalidQuery(s),
            GeoError::ApiError(s) | GeoError::InvalidResponse(s) => CityError::Api(s),
        }
    }
}

/// Messages sent from async operations back to the model
#[derive(Debug)]
pub enum CityServiceMessage {
    SearchDone {
        /// Search generation the request was issued under
        generation: u64,
        query: SearchQuery,
        result: Result<SearchPage, CityError>,
    },
}

/// Fetch one page asynchronously.
/// Sends `SearchDone` on the channel unless `cancel` fires first.
pub fn request_search(
    tx: &Sender<CityServiceMessage>,
    runtime: Option<&tokio::runtime::Handle>,
    client: Option<Arc<CitySearchClient>>,
    query: SearchQuery,
    generation: u64,
    cancel: CancellationToken,
) {
    let tx = tx.clone();

    let (runtime, client) = match (runtime, client) {
        (Some(r), Some(c)) => (r, c),
        _ => {
            let _ = tx.send(CityServiceMessage::SearchDone {
                generation,
                query,
                result: Err(CityError::NotInitialized),
            });
            return;
        }
    };

    runtime.spawn(async move {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => None,
            result = client.search(&query) => Some(result),
        };

        let Some(result) = outcome else {
            tracing::debug!("City search for page {} cancelled", query.page);
            return;
        };

        let result = result.map_err(CityError::from);
        if let Err(e) = &result {
            tracing::warn!("City search failed: {}", e);
        }
        let _ = tx.send(CityServiceMessage::SearchDone {
            generation,
            query,
            result,
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_error_display() {
        assert!(format!("{}", CityError::Network("timeout".into())).contains("network"));
        assert!(format!("{}", CityError::RateLimited(5)).contains("5s"));
        assert!(format!("{}", CityError::NotInitialized).contains("not initialized"));
    }

    #[test]
    fn geo_errors_convert() {
        assert!(matches!(
            CityError::from(GeoError::RateLimited(9)),
            CityError::RateLimited(9)
        ));
        assert!(matches!(
            CityError::from(GeoError::InvalidResponse("x".into())),
            CityError::Api(_)
        ));
    }

    #[test]
    fn missing_client_reports_not_initialized() {
        let (tx, rx) = std::sync::mpsc::channel();
        request_search(
            &tx,
            None,
            None,
            SearchQuery::new("", 1, 20),
            7,
            CancellationToken::new(),
        );

        match rx.try_recv() {
            Ok(CityServiceMessage::SearchDone {
                generation, result, ..
            }) => {
                assert_eq!(generation, 7);
                assert!(matches!(result, Err(CityError::NotInitialized)));
            }
            Err(e) => unreachable!("expected a message, got {e:?}"),
        }
    }
}

//! OpenDataSoft records API client.

use std::time::Duration;

use cityweather_core::{with_retry, RetryConfig};
use tracing::instrument;

use crate::error::GeoError;
use crate::types::*;

#[derive(Debug, Clone)]
pub struct CitySearchClient {
    client: reqwest::Client,
    base_url: String,
    dataset: String,
    retry: RetryConfig,
}

impl CitySearchClient {
    pub fn new(base_url: &str, dataset: &str, timeout: Duration) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            dataset: dataset.to_string(),
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch one page of cities matching `query.term`.
    ///
    /// An empty term lists the whole dataset.
    #[instrument(skip(self), fields(term = %query.term, page = query.page), level = "info")]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchPage, GeoError> {
        if query.rows == 0 {
            return Err(GeoError::InvalidQuery("row count must be positive".to_string()));
        }

        let offset = query.offset();
        let params = [
            ("dataset", self.dataset.clone()),
            ("q", query.term.clone()),
            ("rows", query.rows.to_string()),
            ("start", offset.to_string()),
        ];

        let response = with_retry(self.retry.clone(), || {
            self.client.get(&self.base_url).query(&params).send()
        })
        .await?;

        let body: ApiSearchResponse = self.handle_response(response).await?;
        let records: Vec<CityRecord> = body.records.into_iter().map(CityRecord::from).collect();

        tracing::debug!(
            "City search returned {} records (offset {}, {} total)",
            records.len(),
            offset,
            body.nhits
        );

        Ok(SearchPage {
            records,
            total_hits: body.nhits,
            offset,
        })
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, GeoError> {
        let status = response.status();

        if status.is_success() {
            let text = response.text().await?;
            serde_json::from_str(&text)
                .map_err(|e| GeoError::InvalidResponse(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(GeoError::RateLimited(retry_after))
        } else if status.as_u16() == 400 {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or(text);
            Err(GeoError::InvalidQuery(message))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(GeoError::ApiError(format!("{}: {}", status, text)))
        }
    }
}

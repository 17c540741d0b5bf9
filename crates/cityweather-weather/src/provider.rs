use crate::types::{CurrentWeather, OwmErrorBody, OwmResponse, WeatherError};
use cityweather_core::{with_retry, RetryConfig, Units};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
    unit: Units,
    retry: RetryConfig,
}

impl WeatherProvider {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        unit: Units,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.to_string(),
            api_key,
            unit,
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch current conditions for `city`.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::MissingCity);
        }

        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(WeatherError::MissingApiKey)?;

        let params = [
            ("q", city),
            ("appid", api_key),
            ("units", self.unit.as_query()),
        ];

        let response = with_retry(self.retry.clone(), || {
            self.client.get(&self.base_url).query(&params).send()
        })
        .await?;

        let status = response.status();
        if status.is_success() {
            let text = response.text().await?;
            let raw: OwmResponse = serde_json::from_str(&text)
                .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)))?;
            let weather = raw.into_current(self.unit)?;
            tracing::info!(
                "Fetched weather for {}: {:.1}{} {}",
                weather.location_label(),
                weather.temperature,
                self.unit.temperature_suffix(),
                weather.condition.label()
            );
            return Ok(weather);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<OwmErrorBody>(&text)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or(text);

        match status.as_u16() {
            401 => Err(WeatherError::InvalidApiKey),
            404 => Err(WeatherError::CityNotFound(city.to_string())),
            429 => Err(WeatherError::RateLimited),
            _ => Err(WeatherError::Api(format!("{}: {}", status, message))),
        }
    }
}

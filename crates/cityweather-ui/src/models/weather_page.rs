//! Weather detail page for one city.

use std::sync::mpsc;
use std::sync::Arc;

use cityweather_core::AppError;
use cityweather_weather::{CurrentWeather, MapSettings, MapView, WeatherProvider};
use tokio_util::sync::CancellationToken;

use crate::services::{self, WeatherServiceMessage};
use crate::AppServices;

pub const MISSING_CITY_MESSAGE: &str = "City parameter is missing";
pub const FETCH_FAILED_MESSAGE: &str = "Error fetching weather data. Please try again.";

/// A weather request the page wants issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherFetch {
    pub generation: u64,
    pub city: String,
}

#[derive(Debug, Clone)]
pub struct WeatherPageState {
    city: Option<String>,
    loading: bool,
    error_message: Option<String>,
    weather: Option<CurrentWeather>,
    map: Option<MapView>,
    map_settings: MapSettings,
    /// Bumped on every request; only the latest one may land
    generation: u64,
}

impl WeatherPageState {
    pub fn new(map_settings: MapSettings) -> Self {
        Self {
            city: None,
            loading: false,
            error_message: None,
            weather: None,
            map: None,
            map_settings,
            generation: 0,
        }
    }

    /// Open the page for `city`. Returns the request to issue, if any.
    pub fn begin(&mut self, city: Option<&str>) -> Option<WeatherFetch> {
        let city = city.map(str::trim).filter(|c| !c.is_empty());
        self.generation += 1;

        let Some(city) = city else {
            self.city = None;
            self.loading = false;
            self.weather = None;
            self.map = None;
            self.error_message = Some(MISSING_CITY_MESSAGE.to_string());
            return None;
        };

        if self.city.as_deref() != Some(city) {
            self.weather = None;
            self.map = None;
        }
        self.city = Some(city.to_string());
        self.loading = true;
        self.error_message = None;
        Some(WeatherFetch {
            generation: self.generation,
            city: city.to_string(),
        })
    }

    /// Re-fetch the current city. Does nothing while a request is in flight.
    pub fn refresh(&mut self) -> Option<WeatherFetch> {
        if self.loading {
            return None;
        }
        let city = self.city.clone()?;
        self.begin(Some(&city))
    }

    /// Fold a finished fetch in. Returns false when it was superseded.
    pub fn apply(
        &mut self,
        generation: u64,
        city: &str,
        result: Result<CurrentWeather, String>,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(
                "Dropping weather for {} (generation {} vs {})",
                city,
                generation,
                self.generation
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(weather) => {
                self.map = MapView::for_weather(&weather, &self.map_settings);
                self.weather = Some(weather);
                self.error_message = None;
            }
            Err(cause) => {
                tracing::warn!("Weather fetch for {} failed: {}", city, cause);
                self.error_message = Some(FETCH_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn weather(&self) -> Option<&CurrentWeather> {
        self.weather.as_ref()
    }

    pub fn map(&self) -> Option<&MapView> {
        self.map.as_ref()
    }
}

pub struct WeatherPageModel {
    state: WeatherPageState,
    tx: mpsc::Sender<WeatherServiceMessage>,
    rx: mpsc::Receiver<WeatherServiceMessage>,
    provider: Option<Arc<WeatherProvider>>,
    runtime: Option<tokio::runtime::Handle>,
    cancel: CancellationToken,
}

impl WeatherPageModel {
    pub fn new(services: &AppServices) -> Self {
        let mut model = Self::detached(services.settings().map.clone());
        model.provider = services.weather_provider();
        model.runtime = Some(services.handle());
        model.cancel = services.shutdown_token();
        model
    }

    pub fn detached(map_settings: MapSettings) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: WeatherPageState::new(map_settings),
            tx,
            rx,
            provider: None,
            runtime: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Navigate to `/weather/:city`
    pub fn open(&mut self, city: Option<&str>) {
        if let Some(fetch) = self.state.begin(city) {
            self.dispatch(fetch);
        }
    }

    /// Re-fetch the city currently shown
    pub fn refresh(&mut self) {
        if let Some(fetch) = self.state.refresh() {
            self.dispatch(fetch);
        }
    }

    /// Returns true if state changed
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                WeatherServiceMessage::FetchDone {
                    generation,
                    city,
                    result,
                } => {
                    let result = result.map_err(|e| {
                        let cause = e.to_string();
                        let app = AppError::from(e);
                        format!("{} ({})", cause, app.user_message())
                    });
                    changed |= self.state.apply(generation, &city, result);
                }
            }
        }
        changed
    }

    pub fn state(&self) -> &WeatherPageState {
        &self.state
    }

    fn dispatch(&self, fetch: WeatherFetch) {
        tracing::info!("Fetching weather for {}", fetch.city);
        services::request_fetch(
            &self.tx,
            self.runtime.as_ref(),
            self.provider.clone(),
            fetch.city,
            fetch.generation,
            self.cancel.clone(),
        );
    }
}

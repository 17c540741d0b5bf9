//! Searchable city list with debounced input and append-only paging.
//!
//! `CitiesTableState` is the pure state machine; `CitiesTableModel` wires it
//! to the debouncer and the city service channel.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cityweather_core::AppError;
use cityweather_geo::{CityRecord, CitySearchClient, SearchPage, SearchQuery};
use tokio_util::sync::CancellationToken;

use crate::debounce::Debouncer;
use crate::router::Route;
use crate::services::{self, CityServiceMessage};
use crate::AppServices;

pub const END_OF_LIST_MESSAGE: &str = "No more cities to display.";

/// Scroll position of the table body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn at_bottom(&self) -> bool {
        self.scroll_height - self.scroll_top <= self.client_height
    }
}

/// A page request the state wants issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub generation: u64,
    pub query: SearchQuery,
}

#[derive(Debug, Clone)]
pub struct CitiesTableState {
    cities: Vec<CityRecord>,
    /// Page currently requested or last listed
    page: u32,
    /// Pages actually appended to `cities`
    loaded_pages: u32,
    page_size: u32,
    search_term: String,
    has_more: bool,
    loading: bool,
    error_message: Option<String>,
    /// Bumped on every term change; responses from older generations are dropped
    generation: u64,
    started: bool,
}

impl CitiesTableState {
    pub fn new(page_size: u32) -> Self {
        Self {
            cities: Vec::new(),
            page: 1,
            loaded_pages: 0,
            page_size: page_size.max(1),
            search_term: String::new(),
            has_more: true,
            loading: false,
            error_message: None,
            generation: 0,
            started: false,
        }
    }

    /// First load: page 1 of the unfiltered list. Only fires once.
    pub fn start(&mut self) -> Option<PendingFetch> {
        if self.started {
            return None;
        }
        self.started = true;
        self.loading = true;
        Some(self.pending())
    }

    /// Apply a settled search term. The list restarts from page 1.
    ///
    /// Re-committing the current term changes nothing.
    pub fn commit_search(&mut self, term: &str) -> Option<PendingFetch> {
        if self.started && term == self.search_term {
            return None;
        }
        self.started = true;
        self.search_term = term.to_string();
        Some(self.reset())
    }

    /// Drop everything and re-run the current term from page 1
    pub fn reload(&mut self) -> PendingFetch {
        self.started = true;
        self.reset()
    }

    /// Next page, if there is one and nothing is in flight.
    ///
    /// After a failed first page this re-requests page 1.
    pub fn load_more(&mut self) -> Option<PendingFetch> {
        if !self.started || !self.has_more || self.loading {
            return None;
        }
        self.page = self.loaded_pages + 1;
        self.loading = true;
        self.error_message = None;
        Some(self.pending())
    }

    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<PendingFetch> {
        if metrics.at_bottom() {
            self.load_more()
        } else {
            None
        }
    }

    /// Fold a finished request into the list.
    ///
    /// Returns false when the response was stale and ignored.
    pub fn apply(
        &mut self,
        generation: u64,
        query: &SearchQuery,
        result: Result<SearchPage, String>,
    ) -> bool {
        if generation != self.generation || query.page != self.page {
            tracing::debug!(
                "Dropping stale city page {} (generation {} vs {})",
                query.page,
                generation,
                self.generation
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.has_more = page.has_more();
                self.loaded_pages = query.page;
                self.cities.extend(page.records);
                self.error_message = None;
            }
            Err(message) => {
                self.page = self.loaded_pages.max(1);
                self.error_message = Some(message);
            }
        }
        true
    }

    fn reset(&mut self) -> PendingFetch {
        self.generation += 1;
        self.cities.clear();
        self.page = 1;
        self.loaded_pages = 0;
        self.has_more = true;
        self.error_message = None;
        self.loading = true;
        self.pending()
    }

    fn pending(&self) -> PendingFetch {
        PendingFetch {
            generation: self.generation,
            query: SearchQuery::new(self.search_term.clone(), self.page, self.page_size),
        }
    }

    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Full-table spinner: only while nothing is listed yet
    pub fn show_spinner(&self) -> bool {
        self.loading && self.cities.is_empty()
    }

    pub fn end_of_list_message(&self) -> Option<&'static str> {
        (!self.has_more).then_some(END_OF_LIST_MESSAGE)
    }

    /// Weather page for the row at `index`
    pub fn route_for(&self, index: usize) -> Option<Route> {
        self.cities.get(index).map(|c| Route::weather(c.name.clone()))
    }
}

pub struct CitiesTableModel {
    state: CitiesTableState,
    input: String,
    debouncer: Debouncer<String>,
    tx: mpsc::Sender<CityServiceMessage>,
    rx: mpsc::Receiver<CityServiceMessage>,
    client: Option<Arc<CitySearchClient>>,
    runtime: Option<tokio::runtime::Handle>,
    cancel: CancellationToken,
}

impl CitiesTableModel {
    pub fn new(services: &AppServices) -> Self {
        let settings = services.settings();
        let mut model = Self::detached(settings.page_size, settings.debounce);
        model.client = services.city_client();
        model.runtime = Some(services.handle());
        model.cancel = services.shutdown_token();
        model
    }

    /// A model with no backing service; every fetch reports "not initialized"
    pub fn detached(page_size: u32, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: CitiesTableState::new(page_size),
            input: String::new(),
            debouncer: Debouncer::new(debounce),
            tx,
            rx,
            client: None,
            runtime: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn start(&mut self) {
        if let Some(fetch) = self.state.start() {
            self.dispatch(fetch);
        }
    }

    /// The search box changed
    pub fn on_input(&mut self, text: &str, now: Instant) {
        self.input = text.to_string();
        self.debouncer.push(self.input.clone(), now);
    }

    /// Advance the debounce clock. Returns true when a search was issued.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(term) = self.debouncer.poll(now) else {
            return false;
        };
        match self.state.commit_search(&term) {
            Some(fetch) => {
                tracing::info!("Searching cities for {:?}", term);
                self.dispatch(fetch);
                true
            }
            None => false,
        }
    }

    /// Search for `term` right away, skipping the debounce
    pub fn submit(&mut self, term: &str) -> bool {
        self.debouncer.cancel();
        self.input = term.to_string();
        match self.state.commit_search(term) {
            Some(fetch) => {
                self.dispatch(fetch);
                true
            }
            None => false,
        }
    }

    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        match self.state.on_scroll(metrics) {
            Some(fetch) => {
                self.dispatch(fetch);
                true
            }
            None => false,
        }
    }

    /// Same as scrolling the table body to its end
    pub fn load_more(&mut self) -> bool {
        match self.state.load_more() {
            Some(fetch) => {
                self.dispatch(fetch);
                true
            }
            None => false,
        }
    }

    pub fn refresh(&mut self) {
        self.debouncer.cancel();
        let fetch = self.state.reload();
        self.dispatch(fetch);
    }

    /// Apply every finished request. Returns true if state changed.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                CityServiceMessage::SearchDone {
                    generation,
                    query,
                    result,
                } => {
                    let result = result.map_err(|e| AppError::from(e).user_message().to_string());
                    changed |= self.state.apply(generation, &query, result);
                }
            }
        }
        changed
    }

    pub fn state(&self) -> &CitiesTableState {
        &self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn has_pending_input(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn dispatch(&self, fetch: PendingFetch) {
        tracing::debug!(
            "Requesting city page {} for {:?}",
            fetch.query.page,
            fetch.query.term
        );
        services::request_search(
            &self.tx,
            self.runtime.as_ref(),
            self.client.clone(),
            fetch.query,
            fetch.generation,
            self.cancel.clone(),
        );
    }
}

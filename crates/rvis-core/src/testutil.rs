//! Test utilities: mock implementations of all core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::CrawlError;
use crate::models::{LocationRecord, PageRequest, PageResponse, ScriptLocation, TableRow};
use crate::report::{CrawlEvent, CrawlReporter};
use crate::traits::{PageParser, RecordSink, Transport};

/// A 200 response with the given body.
pub fn ok_page(body: &str) -> PageResponse {
    PageResponse {
        status: 200,
        body: body.to_string(),
    }
}

// ---------------------------------------------------------------------------
// MockTransport
// ---------------------------------------------------------------------------

/// Mock transport that replays queued responses and records every request.
#[derive(Clone)]
pub struct MockTransport {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns an empty 200 page.
    responses: Arc<Mutex<Vec<Result<PageResponse, CrawlError>>>>,
    pub requests: Arc<Mutex<Vec<PageRequest>>>,
}

impl MockTransport {
    /// 200 responses with the given bodies, in order.
    pub fn with_pages(bodies: Vec<&str>) -> Self {
        Self::with_responses(bodies.into_iter().map(|b| Ok(ok_page(b))).collect())
    }

    pub fn with_responses(responses: Vec<Result<PageResponse, CrawlError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Transport for MockTransport {
    async fn execute(&self, request: PageRequest) -> Result<PageResponse, CrawlError> {
        self.requests.lock().unwrap().push(request);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(ok_page(""))
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockParser
// ---------------------------------------------------------------------------

/// Mock parser keyed by the exact page body.
///
/// Unknown bodies yield no token and no data, i.e. an empty page.
#[derive(Clone, Default)]
pub struct MockParser {
    tokens: HashMap<String, String>,
    pages: HashMap<String, (Vec<TableRow>, Vec<ScriptLocation>)>,
}

impl MockParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, html: &str, token: &str) -> Self {
        self.tokens.insert(html.to_string(), token.to_string());
        self
    }

    pub fn with_page(
        mut self,
        html: &str,
        rows: Vec<TableRow>,
        locations: Vec<ScriptLocation>,
    ) -> Self {
        self.pages.insert(html.to_string(), (rows, locations));
        self
    }
}

impl PageParser for MockParser {
    fn token(&self, html: &str) -> Option<String> {
        self.tokens.get(html).cloned()
    }

    fn script_locations(&self, html: &str) -> Vec<ScriptLocation> {
        self.pages
            .get(html)
            .map(|(_, locations)| locations.clone())
            .unwrap_or_default()
    }

    fn table_rows(&self, html: &str) -> Vec<TableRow> {
        self.pages
            .get(html)
            .map(|(rows, _)| rows.clone())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// MockSink
// ---------------------------------------------------------------------------

/// Mock sink that records each appended batch.
#[derive(Clone)]
pub struct MockSink {
    pub appended: Arc<Mutex<Vec<Vec<LocationRecord>>>>,
    error: Arc<Mutex<Option<CrawlError>>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            appended: Arc::new(Mutex::new(Vec::new())),
            error: Arc::new(Mutex::new(None)),
        }
    }

    /// Sink whose first append fails.
    pub fn with_error(error: CrawlError) -> Self {
        Self {
            appended: Arc::new(Mutex::new(Vec::new())),
            error: Arc::new(Mutex::new(Some(error))),
        }
    }
}

impl RecordSink for MockSink {
    fn append(&mut self, records: &[LocationRecord]) -> Result<(), CrawlError> {
        let mut err = self.error.lock().unwrap();
        if let Some(e) = err.take() {
            return Err(e);
        }
        self.appended.lock().unwrap().push(records.to_vec());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingReporter
// ---------------------------------------------------------------------------

/// Reporter that records event names in order.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    pub events: Arc<Mutex<Vec<String>>>,
    pub token_prefix: Arc<Mutex<Option<String>>>,
}

impl CrawlReporter for RecordingReporter {
    fn report(&self, event: CrawlEvent<'_>) {
        if let CrawlEvent::TokenAcquired { prefix } = &event {
            *self.token_prefix.lock().unwrap() = Some(prefix.to_string());
        }
        self.events.lock().unwrap().push(event.name().to_string());
    }
}

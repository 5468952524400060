use std::future::Future;

use crate::error::CrawlError;
use crate::models::{LocationRecord, PageRequest, PageResponse, ScriptLocation, TableRow};

/// Performs HTTP requests on behalf of a [`crate::session::Session`].
///
/// Implementations own the cookie jar and the fixed header set. They report
/// transport failures as errors and return every HTTP response, whatever
/// its status; the session decides what counts as success.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<PageResponse, CrawlError>> + Send;
}

/// Pulls the three data sources out of a page's markup.
///
/// None of the methods fail: missing or malformed markup yields `None` or
/// an empty sequence.
pub trait PageParser: Send + Sync {
    /// Anti-forgery token from the landing page.
    fn token(&self, html: &str) -> Option<String>;

    /// Coordinate entries from the inline script array, in source order.
    fn script_locations(&self, html: &str) -> Vec<ScriptLocation>;

    /// Data rows from the results table, in document order.
    fn table_rows(&self, html: &str) -> Vec<TableRow>;
}

/// Append-only destination for reconciled records.
pub trait RecordSink {
    /// Append one page worth of records. Called once per page.
    fn append(&mut self, records: &[LocationRecord]) -> Result<(), CrawlError>;
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn append(&mut self, records: &[LocationRecord]) -> Result<(), CrawlError> {
        (**self).append(records)
    }
}

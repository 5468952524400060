use thiserror::Error;

/// Error types for the RVIS crawler.
///
/// An empty page is deliberately absent: running out of results is the
/// normal end of a crawl and is reported as [`crate::crawl::Termination::Exhausted`].
#[derive(Error, Debug)]
pub enum CrawlError {
    /// Network/connection error reported by the transport.
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The server answered with something other than HTTP 200.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// The landing page carried no anti-forgery token.
    #[error("No anti-forgery token found on {url}")]
    TokenMissing { url: String },

    /// Appending records to the output failed.
    #[error("Sink error: {0}")]
    Sink(String),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CrawlError {
    /// Returns true for transport-level failures (the request never produced
    /// an HTTP response).
    pub fn is_transport(&self) -> bool {
        matches!(self, CrawlError::Network(_) | CrawlError::Timeout(_))
    }

    /// Returns true when the server responded with a non-200 status.
    pub fn is_protocol(&self) -> bool {
        matches!(self, CrawlError::HttpStatus { .. })
    }
}

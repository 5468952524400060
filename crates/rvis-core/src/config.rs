use std::time::Duration;

use url::Url;

use crate::error::CrawlError;
use crate::models::SearchFilter;
use crate::pacing::PacingConfig;

/// Landing page of the public service-location registry. The search form
/// posts back to the same URL.
pub const DEFAULT_LANDING_URL: &str = "https://rvis.mohw.gov.tw/mgov-rvis/home/map";

/// Desktop browser user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub landing_url: String,
    pub user_agent: String,
    /// Per-request bound; there is no retry.
    pub timeout: Duration,
    pub pacing: PacingConfig,
    /// Stop after this many pages even if results keep coming.
    pub max_pages: Option<u32>,
    pub filter: SearchFilter,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            landing_url: DEFAULT_LANDING_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            pacing: PacingConfig::default(),
            max_pages: None,
            filter: SearchFilter::default(),
        }
    }
}

impl CrawlConfig {
    pub fn new(landing_url: impl Into<String>) -> Self {
        Self {
            landing_url: landing_url.into(),
            ..Self::default()
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_filter(mut self, filter: SearchFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Reject settings that could never produce a crawl.
    pub fn validate(&self) -> Result<(), CrawlError> {
        let url = Url::parse(&self.landing_url).map_err(|e| {
            CrawlError::Config(format!("Invalid landing URL '{}': {e}", self.landing_url))
        })?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(CrawlError::Config(format!(
                    "URL scheme '{scheme}' is not allowed (only http/https)"
                )));
            }
        }
        if self.timeout.is_zero() {
            return Err(CrawlError::Config("Timeout must be at least 1 second".into()));
        }
        if self.max_pages == Some(0) {
            return Err(CrawlError::Config("max_pages must be at least 1".into()));
        }
        Ok(())
    }
}

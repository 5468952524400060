use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use rvis_core::config::CrawlConfig;
use rvis_core::error::CrawlError;
use rvis_core::models::{Method, PageRequest, PageResponse};
use rvis_core::traits::Transport;

/// Browser-like headers sent with every request to reduce bot-detection
/// friction.
const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("accept-language", "zh-TW,zh;q=0.9,en-US;q=0.8,en;q=0.7"),
    ("accept-encoding", "gzip, deflate, br"),
    ("upgrade-insecure-requests", "1"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "same-origin"),
];

/// HTTP transport using reqwest.
///
/// Holds one cookie jar for the lifetime of the run so the server keeps
/// every page submission in the same search context. Redirects are
/// followed; non-200 statuses are returned, not raised.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    cookies: Arc<Jar>,
    timeout_secs: u64,
}

impl ReqwestTransport {
    pub fn new(config: &CrawlConfig) -> Result<Self, CrawlError> {
        Self::with_timeout(config.timeout, &config.user_agent)
    }

    pub fn with_timeout(timeout: Duration, user_agent: &str) -> Result<Self, CrawlError> {
        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(browser_headers())
            .cookie_provider(Arc::clone(&cookies))
            .timeout(timeout)
            .build()
            .map_err(|e| CrawlError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            cookies,
            timeout_secs: timeout.as_secs(),
        })
    }

    /// `Cookie` header value the jar would send to `url`.
    pub fn cookie_header(&self, url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        let value = self.cookies.cookies(&url)?;
        value.to_str().ok().map(str::to_string)
    }

    fn map_error(&self, e: reqwest::Error) -> CrawlError {
        if e.is_timeout() {
            CrawlError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            CrawlError::Network(format!("Connection failed: {e}"))
        } else {
            CrawlError::Network(e.to_string())
        }
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: PageRequest) -> Result<PageResponse, CrawlError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            // `form` sets `Content-Type: application/x-www-form-urlencoded`.
            Method::Post => self.client.post(&request.url).form(&request.form),
        };
        if let Some(referer) = &request.referer {
            builder = builder.header(header::REFERER, referer);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        if status != 200 {
            tracing::warn!(url = %request.url, status, "HTTP error");
        }

        let body = response
            .text()
            .await
            .map_err(|e| CrawlError::Network(format!("Failed to read response body: {e}")))?;

        Ok(PageResponse { status, body })
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in BROWSER_HEADERS {
        headers.insert(*name, HeaderValue::from_static(value));
    }
    headers
}

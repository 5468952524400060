use crate::error::CrawlError;
use crate::models::{PageRequest, PageResponse, SearchFilter, SearchForm};
use crate::traits::{PageParser, Transport};

/// Explicit crawl session: the transport (which carries the cookie jar for
/// the lifetime of the run) plus the anti-forgery token.
///
/// The token is only ever set by [`Session::establish`], which re-fetches the
/// landing page.
pub struct Session<T: Transport> {
    transport: T,
    landing_url: String,
    token: Option<String>,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, landing_url: impl Into<String>) -> Self {
        Self {
            transport,
            landing_url: landing_url.into(),
            token: None,
        }
    }

    pub fn landing_url(&self) -> &str {
        &self.landing_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue a request and require HTTP 200.
    pub async fn request(&self, request: PageRequest) -> Result<PageResponse, CrawlError> {
        let url = request.url.clone();
        let response = self.transport.execute(request).await?;
        if response.status != 200 {
            return Err(CrawlError::HttpStatus {
                status: response.status,
                url,
            });
        }
        Ok(response)
    }

    /// Fetch the landing page and store its anti-forgery token.
    ///
    /// On failure the previous token (if any) is cleared.
    pub async fn establish<P: PageParser>(&mut self, parser: &P) -> Result<&str, CrawlError> {
        self.token = None;
        let response = self.request(PageRequest::get(&self.landing_url)).await?;
        let token = parser
            .token(&response.body)
            .ok_or_else(|| CrawlError::TokenMissing {
                url: self.landing_url.clone(),
            })?;
        Ok(self.token.insert(token).as_str())
    }

    /// Submit the search form for `page` (1-based) and return the page body.
    pub async fn submit_page(&self, page: u32, filter: &SearchFilter) -> Result<String, CrawlError> {
        let token = self.token.as_deref().ok_or_else(|| CrawlError::TokenMissing {
            url: self.landing_url.clone(),
        })?;
        let form = SearchForm {
            token,
            page,
            filter,
        };
        let request = PageRequest::post_form(&self.landing_url, form.fields(), &self.landing_url);
        Ok(self.request(request).await?.body)
    }
}

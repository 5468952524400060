use crate::crawl::{CrawlSummary, Termination};

/// Progress events emitted by the crawl driver.
#[derive(Debug, Clone)]
pub enum CrawlEvent<'a> {
    Started {
        url: &'a str,
    },
    TokenAcquired {
        /// First characters of the token only; the full value is never reported.
        prefix: &'a str,
    },
    PageFetched {
        page: u32,
        bytes: usize,
    },
    PageExtracted {
        page: u32,
        rows: usize,
        locations: usize,
        records: usize,
    },
    PagePersisted {
        page: u32,
        records: usize,
        total: usize,
    },
    Finished {
        summary: &'a CrawlSummary,
    },
}

impl CrawlEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            CrawlEvent::Started { .. } => "started",
            CrawlEvent::TokenAcquired { .. } => "token_acquired",
            CrawlEvent::PageFetched { .. } => "page_fetched",
            CrawlEvent::PageExtracted { .. } => "page_extracted",
            CrawlEvent::PagePersisted { .. } => "page_persisted",
            CrawlEvent::Finished { .. } => "finished",
        }
    }
}

/// Receives crawl events (decoupled logging).
pub trait CrawlReporter: Send + Sync {
    fn report(&self, event: CrawlEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCrawlReporter;

impl CrawlReporter for TracingCrawlReporter {
    fn report(&self, event: CrawlEvent<'_>) {
        match event {
            CrawlEvent::Started { url } => {
                tracing::info!(%url, "Starting crawl");
            }
            CrawlEvent::TokenAcquired { prefix } => {
                tracing::info!("Found anti-forgery token: {prefix}...");
            }
            CrawlEvent::PageFetched { page, bytes } => {
                tracing::debug!(page, bytes, "Fetched page");
            }
            CrawlEvent::PageExtracted {
                page,
                rows,
                locations,
                records,
            } => {
                if records == 0 {
                    tracing::info!(page, "No locations found, stopping");
                } else {
                    tracing::info!(page, rows, locations, "Found {records} locations");
                }
            }
            CrawlEvent::PagePersisted {
                page,
                records,
                total,
            } => {
                tracing::debug!(page, records, total, "Persisted page");
            }
            CrawlEvent::Finished { summary } => match &summary.termination {
                Termination::Aborted(error) => {
                    tracing::warn!(
                        pages = summary.pages,
                        records = summary.records,
                        %error,
                        "Crawl aborted"
                    );
                }
                termination => {
                    tracing::info!(
                        pages = summary.pages,
                        records = summary.records,
                        ?termination,
                        "Crawl completed"
                    );
                }
            },
        }
    }
}

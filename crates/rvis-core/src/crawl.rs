use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::models::LocationRecord;
use crate::reconcile::merge;
use crate::report::{CrawlEvent, CrawlReporter};
use crate::session::Session;
use crate::traits::{PageParser, RecordSink, Transport};

/// Number of token characters shown in progress output.
const TOKEN_PREFIX_LEN: usize = 10;

/// States of the pagination driver.
///
/// `FetchingToken → SubmittingPage(1) → Extracting → Persisting →
/// SubmittingPage(2) → … → Done`. Every failure transitions straight to
/// `Done`; there is no retry.
#[derive(Debug)]
pub enum CrawlState {
    FetchingToken,
    SubmittingPage { page: u32 },
    Extracting { page: u32, html: String },
    Persisting { page: u32, records: Vec<LocationRecord> },
    Done(CrawlSummary),
}

impl CrawlState {
    pub fn is_done(&self) -> bool {
        matches!(self, CrawlState::Done(_))
    }
}

/// Why a crawl stopped.
#[derive(Debug)]
pub enum Termination {
    /// `page` merged to zero records: there are no more results.
    Exhausted { page: u32 },
    /// The configured page cap was reached.
    PageLimit { max_pages: u32 },
    /// A fetch, token or sink failure ended the run. Pages persisted before
    /// the failure stand.
    Aborted(CrawlError),
}

/// Final report of a crawl.
#[derive(Debug)]
pub struct CrawlSummary {
    /// Pages whose records were persisted.
    pub pages: u32,
    /// Total records persisted.
    pub records: usize,
    pub termination: Termination,
}

impl CrawlSummary {
    pub fn is_complete(&self) -> bool {
        !matches!(self.termination, Termination::Aborted(_))
    }
}

/// Drives the fetch → extract → reconcile → persist cycle across pages.
///
/// Generic over the transport, parser and sink so each transition can be
/// exercised with canned pages.
pub struct CrawlService<T, P, S>
where
    T: Transport,
    P: PageParser,
    S: RecordSink,
{
    session: Session<T>,
    parser: P,
    sink: S,
    config: CrawlConfig,
    pages: u32,
    records: usize,
}

impl<T, P, S> CrawlService<T, P, S>
where
    T: Transport,
    P: PageParser,
    S: RecordSink,
{
    pub fn new(transport: T, parser: P, sink: S, config: CrawlConfig) -> Self {
        Self {
            session: Session::new(transport, config.landing_url.clone()),
            parser,
            sink,
            config,
            pages: 0,
            records: 0,
        }
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run from `FetchingToken` until `Done`.
    pub async fn run<R: CrawlReporter>(&mut self, reporter: &R) -> CrawlSummary {
        reporter.report(CrawlEvent::Started {
            url: &self.config.landing_url,
        });

        let mut state = CrawlState::FetchingToken;
        let summary = loop {
            state = self.step(state, reporter).await;
            if let CrawlState::Done(summary) = state {
                break summary;
            }
        };

        reporter.report(CrawlEvent::Finished { summary: &summary });
        summary
    }

    /// Perform one transition.
    pub async fn step<R: CrawlReporter>(&mut self, state: CrawlState, reporter: &R) -> CrawlState {
        match state {
            CrawlState::FetchingToken => {
                let established = self
                    .session
                    .establish(&self.parser)
                    .await
                    .map(|token| token.chars().take(TOKEN_PREFIX_LEN).collect::<String>());
                match established {
                    Ok(prefix) => {
                        reporter.report(CrawlEvent::TokenAcquired { prefix: &prefix });
                        CrawlState::SubmittingPage { page: 1 }
                    }
                    Err(e) => self.finish(Termination::Aborted(e)),
                }
            }

            CrawlState::SubmittingPage { page } => {
                if let Some(max_pages) = self.config.max_pages.filter(|max| page > *max) {
                    return self.finish(Termination::PageLimit { max_pages });
                }
                tracing::info!(page, "Processing page");
                match self.session.submit_page(page, &self.config.filter).await {
                    Ok(html) => {
                        reporter.report(CrawlEvent::PageFetched {
                            page,
                            bytes: html.len(),
                        });
                        CrawlState::Extracting { page, html }
                    }
                    Err(e) => self.finish(Termination::Aborted(e)),
                }
            }

            CrawlState::Extracting { page, html } => {
                let locations = self.parser.script_locations(&html);
                let rows = self.parser.table_rows(&html);
                let records = merge(&rows, &locations);

                reporter.report(CrawlEvent::PageExtracted {
                    page,
                    rows: rows.len(),
                    locations: locations.len(),
                    records: records.len(),
                });

                if records.is_empty() {
                    self.finish(Termination::Exhausted { page })
                } else {
                    CrawlState::Persisting { page, records }
                }
            }

            CrawlState::Persisting { page, records } => {
                if let Err(e) = self.sink.append(&records) {
                    return self.finish(Termination::Aborted(e));
                }
                self.pages += 1;
                self.records += records.len();
                reporter.report(CrawlEvent::PagePersisted {
                    page,
                    records: records.len(),
                    total: self.records,
                });

                // No pause once the cap is reached: nothing else will be requested.
                if let Some(max_pages) = self.config.max_pages.filter(|max| page >= *max) {
                    return self.finish(Termination::PageLimit { max_pages });
                }
                self.config.pacing.pause().await;
                CrawlState::SubmittingPage { page: page + 1 }
            }

            done @ CrawlState::Done(_) => done,
        }
    }

    fn finish(&self, termination: Termination) -> CrawlState {
        CrawlState::Done(CrawlSummary {
            pages: self.pages,
            records: self.records,
            termination,
        })
    }
}

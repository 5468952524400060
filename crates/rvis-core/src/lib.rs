pub mod config;
pub mod crawl;
pub mod error;
pub mod models;
pub mod pacing;
pub mod reconcile;
pub mod report;
pub mod session;
pub mod traits;

#[cfg(test)]
mod testutil;

pub use config::CrawlConfig;
pub use crawl::{CrawlService, CrawlState, CrawlSummary, Termination};
pub use error::CrawlError;
pub use models::{LocationRecord, ScriptLocation, SearchFilter, TableRow};
pub use reconcile::merge;
pub use report::{CrawlReporter, TracingCrawlReporter};
pub use session::Session;
pub use traits::{PageParser, RecordSink, Transport};

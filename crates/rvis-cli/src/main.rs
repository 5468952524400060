use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rvis_client::{RegistryPageParser, ReqwestTransport};
use rvis_core::config::{DEFAULT_LANDING_URL, DEFAULT_USER_AGENT};
use rvis_core::pacing::PacingConfig;
use rvis_core::traits::{PageParser, RecordSink};
use rvis_core::{
    CrawlConfig, CrawlService, CrawlSummary, LocationRecord, SearchFilter, Termination,
    TracingCrawlReporter, merge,
};
use rvis_store::CsvSink;

#[derive(Parser)]
#[command(name = "rvis", version, about = "Service-location registry crawler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl every result page and write the records to CSV
    Crawl(CrawlArgs),

    /// Run the extractors over a saved results page
    Inspect {
        /// Saved HTML page
        file: PathBuf,

        /// Write CSV here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Landing page of the search form
    #[arg(short, long, env = "RVIS_URL", default_value = DEFAULT_LANDING_URL)]
    url: String,

    /// Output CSV file (truncated on start)
    #[arg(short, long, env = "RVIS_OUTPUT", default_value = "rvis_all_data.csv")]
    output: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, env = "RVIS_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Pause between pages in milliseconds
    #[arg(long, env = "RVIS_PAGE_DELAY_MS", default_value_t = 1000)]
    delay_ms: u64,

    /// Stop after this many pages
    #[arg(long, env = "RVIS_MAX_PAGES")]
    max_pages: Option<u32>,

    #[arg(long, env = "RVIS_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// County filter (empty = all)
    #[arg(long, default_value = "")]
    county: String,

    /// Town filter (empty = all)
    #[arg(long, default_value = "")]
    town: String,

    /// Village filter (empty = all)
    #[arg(long, default_value = "")]
    village: String,
}

impl CrawlArgs {
    fn to_config(&self) -> CrawlConfig {
        CrawlConfig::new(&self.url)
            .with_user_agent(&self.user_agent)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_pacing(PacingConfig::new(Duration::from_millis(self.delay_ms)))
            .with_max_pages(self.max_pages)
            .with_filter(SearchFilter {
                county: self.county.clone(),
                town: self.town.clone(),
                village: self.village.clone(),
            })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so `inspect` can stream CSV on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rvis=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl(args) => cmd_crawl(&args).await?,
        Commands::Inspect { file, output } => cmd_inspect(&file, output.as_deref())?,
    }

    Ok(())
}

async fn cmd_crawl(args: &CrawlArgs) -> Result<()> {
    let config = args.to_config();
    config.validate().context("Invalid crawl configuration")?;

    let mut sink = CsvSink::create(&args.output)
        .with_context(|| format!("Failed to initialize {}", args.output.display()))?;
    let transport = ReqwestTransport::new(&config).context("Failed to create HTTP client")?;

    let mut service = CrawlService::new(transport, RegistryPageParser::new(), &mut sink, config);
    let summary = service.run(&TracingCrawlReporter).await;
    let session_cookie = service.session().transport().cookie_header(&args.url).is_some();
    tracing::debug!(session_cookie, rows = sink.written(), "Output closed");

    println!("{}", describe(&summary, &args.output));
    Ok(())
}

fn cmd_inspect(file: &Path, output: Option<&Path>) -> Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let parser = RegistryPageParser::new();
    let token = parser.token(&html);
    let locations = parser.script_locations(&html);
    let rows = parser.table_rows(&html);
    let records = merge(&rows, &locations);
    let located = count_located(&records);

    tracing::info!(
        token = token.is_some(),
        script_locations = locations.len(),
        table_rows = rows.len(),
        records = records.len(),
        located,
        "Inspected {}",
        file.display()
    );

    match output {
        Some(path) => {
            let mut sink = CsvSink::create(path)
                .with_context(|| format!("Failed to initialize {}", path.display()))?;
            sink.append(&records)?;
        }
        None => {
            let mut sink = CsvSink::from_writer(std::io::stdout().lock())?;
            sink.append(&records)?;
            sink.into_inner()?.flush()?;
        }
    }

    Ok(())
}

/// Records carrying both coordinates.
fn count_located(records: &[LocationRecord]) -> usize {
    records.iter().filter(|r| r.has_coordinates()).count()
}

/// One-line final report for a finished crawl.
fn describe(summary: &CrawlSummary, output: &Path) -> String {
    let outcome = match &summary.termination {
        Termination::Exhausted { page } => format!("completed (page {page} was empty)"),
        Termination::PageLimit { max_pages } => format!("stopped at page limit {max_pages}"),
        Termination::Aborted(e) => format!("aborted: {e}"),
    };
    format!(
        "Crawl {outcome}. Pages: {}, records: {}, output: {}",
        summary.pages,
        summary.records,
        output.display()
    )
}

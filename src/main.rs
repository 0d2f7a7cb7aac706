use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use directory_crawler::{CrawlRequest, CrawlService, PageRange, SiteKind, Timeouts};
use tower::Service;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "directory-crawler",
    about = "Crawl a paginated listing site and save the records as CSV"
)]
struct Cli {
    /// Target site
    #[arg(value_enum)]
    site: SiteKind,

    /// First page to crawl
    #[arg(long, default_value_t = 1)]
    start: u32,

    /// Last page to crawl (inclusive)
    #[arg(long)]
    end: u32,

    /// Directory for the timestamped CSV file
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Exact CSV path (overrides --output-dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Upper bound for page loads and page changes, in seconds
    #[arg(long, default_value_t = 30)]
    nav_timeout: u64,

    /// Upper bound for list and detail markers to appear, in seconds
    #[arg(long, default_value_t = 20)]
    wait_timeout: u64,
}

impl Cli {
    fn timeouts(&self) -> Timeouts {
        Timeouts {
            navigation: Duration::from_secs(self.nav_timeout),
            list: Duration::from_secs(self.wait_timeout),
            detail: Duration::from_secs(self.wait_timeout),
            ..Timeouts::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let range = PageRange::new(cli.start, cli.end)?;

    let mut request = CrawlRequest::new(cli.site, range)
        .with_output_dir(&cli.output_dir)
        .with_headless(!cli.headful)
        .with_timeouts(cli.timeouts());
    if let Some(path) = &cli.output {
        request = request.with_output_path(path);
    }

    let mut service = CrawlService::new();
    let result = service.call(request).await?;

    match result.csv_path {
        Some(path) => println!(
            "Saved {} records to {}",
            result.records.len(),
            path.display()
        ),
        None => println!("No data collected."),
    }

    Ok(())
}

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::config::{PageRange, ScraperConfig, Timeouts};
use crate::error::ScraperError;
use crate::record::RecordCollection;
use crate::site_scraper::SiteScraper;
use crate::sites::SiteKind;
use crate::traits::Scraper;

/// クロールリクエスト
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub site: SiteKind,
    pub range: PageRange,
    pub output_dir: PathBuf,
    pub output_path: Option<PathBuf>,
    pub headless: bool,
    pub timeouts: Timeouts,
}

impl CrawlRequest {
    pub fn new(site: SiteKind, range: PageRange) -> Self {
        Self {
            site,
            range,
            output_dir: PathBuf::from("."),
            output_path: None,
            headless: true,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

impl From<CrawlRequest> for ScraperConfig {
    fn from(req: CrawlRequest) -> Self {
        let config = ScraperConfig::new(req.range)
            .with_headless(req.headless)
            .with_output_dir(req.output_dir)
            .with_timeouts(req.timeouts);

        match req.output_path {
            Some(path) => config.with_output_path(path),
            None => config,
        }
    }
}

/// クロール結果
#[derive(Debug)]
pub struct CrawlResult {
    pub records: RecordCollection,
    /// レコードが0件の場合は None
    pub csv_path: Option<PathBuf>,
}

/// tower::Serviceを実装したクロールサービス
#[derive(Debug, Clone, Default)]
pub struct CrawlService {}

impl CrawlService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service<CrawlRequest> for CrawlService {
    type Response = CrawlResult;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: CrawlRequest) -> Self::Future {
        info!(
            "Crawl request: site={:?} pages={}..={}",
            req.site, req.range.start, req.range.end
        );

        Box::pin(async move {
            let profile = req.site.profile();
            let config: ScraperConfig = req.into();
            let mut scraper = SiteScraper::new(config, profile);

            // close は execute 内で必ず呼ばれる
            let records = scraper.execute().await?;
            let csv_path = scraper.save(&records)?;

            info!(
                "Crawl finished: site={} records={} path={:?}",
                profile.name,
                records.len(),
                csv_path
            );

            Ok(CrawlResult { records, csv_path })
        })
    }
}

//! 公開ディレクトリ/一覧サイトのクローラーライブラリ
//!
//! - 中小企業支援ポータル (smes.go.kr) の事例・相談ボードを一覧 → 詳細の順に巡回
//! - 経営技術指導士会 (kmtca.or.kr) の検索一覧をページURLで巡回
//! - 収集結果を BOM 付き UTF-8 の CSV に保存
//!
//! # 使用例
//!
//! ```rust,ignore
//! use directory_crawler::{CrawlRequest, CrawlService, PageRange, SiteKind};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = CrawlService::new();
//!
//!     let request = CrawlRequest::new(SiteKind::SmesClinic, PageRange::new(1, 57).unwrap())
//!         .with_output_dir("./data")
//!         .with_headless(true);
//!
//!     let result = service.call(request).await.unwrap();
//!     println!("{} records -> {:?}", result.records.len(), result.csv_path);
//! }
//! ```
//!
//! # ドライバー単体での使用例
//!
//! ```rust,ignore
//! use directory_crawler::{ChromeSession, CrawlDriver, PageRange, ScraperConfig};
//! use directory_crawler::sites::SMES_PROBLEM;
//!
//! let config = ScraperConfig::new(PageRange::new(501, 522)?);
//! let session = ChromeSession::launch(&config).await?;
//! let records = CrawlDriver::new(&session, &SMES_PROBLEM, &config.timeouts)
//!     .run(config.range)
//!     .await?;
//! ```

pub mod browser;
pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod output;
pub mod record;
pub mod service;
pub mod site_scraper;
pub mod sites;
pub mod traits;
pub mod wait;

// 主要な型をリエクスポート
pub use browser::ChromeSession;
pub use config::{PageRange, ScraperConfig, Timeouts};
pub use crawl::{CrawlDriver, SiteProfile};
pub use error::ScraperError;
pub use record::{Record, RecordCollection};
pub use service::{CrawlRequest, CrawlResult, CrawlService};
pub use site_scraper::SiteScraper;
pub use sites::SiteKind;
pub use traits::{BrowserSession, ClickMode, Scraper};

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::browser::ChromeSession;
use crate::config::ScraperConfig;
use crate::crawl::{CrawlDriver, SiteProfile};
use crate::error::ScraperError;
use crate::output;
use crate::record::RecordCollection;
use crate::traits::{BrowserSession, Scraper};

/// 1サイト分のクローラー（Chrome バックエンド）
pub struct SiteScraper {
    config: ScraperConfig,
    profile: &'static SiteProfile,
    session: Option<ChromeSession>,
}

impl SiteScraper {
    pub fn new(config: ScraperConfig, profile: &'static SiteProfile) -> Self {
        Self {
            config,
            profile,
            session: None,
        }
    }

    pub fn profile(&self) -> &'static SiteProfile {
        self.profile
    }

    fn get_session(&self) -> Result<&ChromeSession, ScraperError> {
        self.session
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserInit("ブラウザが初期化されていません".into()))
    }

    /// 出力先: 明示指定がなければ `<output_dir>/<site>_data_<timestamp>.csv`
    pub fn output_path(&self) -> PathBuf {
        self.config
            .output_path
            .clone()
            .unwrap_or_else(|| output::default_output_path(&self.config.output_dir, self.profile.name))
    }

    /// レコードをCSVに保存。空なら何も書かず `None`
    pub fn save(&self, records: &RecordCollection) -> Result<Option<PathBuf>, ScraperError> {
        if records.is_empty() {
            info!("No data collected for {}, nothing saved", self.profile.name);
            return Ok(None);
        }

        let path = self.output_path();
        output::save_csv(&path, records)?;
        Ok(Some(path))
    }
}

#[async_trait]
impl Scraper for SiteScraper {
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        let session = ChromeSession::launch(&self.config).await?;
        self.session = Some(session);
        Ok(())
    }

    async fn crawl(&mut self) -> Result<RecordCollection, ScraperError> {
        let session = self.get_session()?;
        info!(
            "Crawling {} pages {}..={}",
            self.profile.name, self.config.range.start, self.config.range.end
        );

        CrawlDriver::new(session, self.profile, &self.config.timeouts)
            .run(self.config.range)
            .await
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        match self.session.take() {
            Some(mut session) => session.close().await,
            None => Ok(()),
        }
    }
}

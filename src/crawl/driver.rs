//! ページ範囲の巡回（一覧 → 詳細 → 一覧へ戻る）

use tracing::{debug, error, info, warn};

use crate::config::{PageRange, Timeouts};
use crate::error::ScraperError;
use crate::extract;
use crate::record::{Record, RecordCollection};
use crate::traits::BrowserSession;
use crate::wait;

use super::types::{Pagination, RowMode, SiteProfile};

/// 1回の巡回を実行するドライバー
///
/// セッションは呼び出し側が所有し、ドライバーは借用するだけ。
pub struct CrawlDriver<'a, S: BrowserSession + ?Sized> {
    session: &'a S,
    profile: &'a SiteProfile,
    timeouts: &'a Timeouts,
}

impl<'a, S: BrowserSession + ?Sized> CrawlDriver<'a, S> {
    pub fn new(session: &'a S, profile: &'a SiteProfile, timeouts: &'a Timeouts) -> Self {
        Self {
            session,
            profile,
            timeouts,
        }
    }

    /// ページ範囲を巡回してレコードを集める
    ///
    /// エラーを返すのは初期ロードの失敗のみ。ページ送りに失敗した時点で巡回を
    /// 打ち切り、それまでのレコードを返す。
    pub async fn run(&self, range: PageRange) -> Result<RecordCollection, ScraperError> {
        let mut records = RecordCollection::new(self.profile.fields);

        self.load_initial(range.start).await?;

        if range.is_empty() {
            info!(
                "Empty page range {}..={}, nothing to crawl",
                range.start, range.end
            );
            return Ok(records);
        }

        if let Pagination::Script { call } = self.profile.pagination {
            if range.start > 1 {
                if let Err(e) = self.jump(call, range.start).await {
                    error!("Failed to reach start page {}: {}", range.start, e);
                    return Ok(records);
                }
            }
        }

        for page in range.pages() {
            info!("[page {}] Processing list...", page);

            if page > range.start {
                if let Err(e) = self.advance(page).await {
                    error!("Failed to move to page {}, stopping crawl: {}", page, e);
                    break;
                }
            }

            if let Err(e) = self.process_page(page, &mut records).await {
                warn!("[page {}] List processing failed: {}", page, e);
            }
        }

        info!(
            "Crawl of {} finished: {} records",
            self.profile.name,
            records.len()
        );
        Ok(records)
    }

    async fn load_initial(&self, start_page: u32) -> Result<(), ScraperError> {
        let url = self.profile.initial_url(start_page);
        info!("Opening {}", url);
        self.session.goto(&url).await?;
        wait::for_ready(
            self.session,
            self.timeouts.navigation,
            self.timeouts.poll_interval,
        )
        .await
    }

    /// 次のページへ移動
    async fn advance(&self, page: u32) -> Result<(), ScraperError> {
        match self.profile.pagination {
            Pagination::Script { call } => match self.click_page_link(page).await {
                Ok(()) => {
                    info!("Moved to page {} via page link", page);
                    Ok(())
                }
                Err(e) => {
                    if e.is_timeout() {
                        warn!("Page link {} not available: {}", page, e);
                    } else {
                        warn!("Page link {} click failed: {}", page, e);
                    }
                    info!("Trying direct jump to page {}...", page);
                    self.jump(call, page).await
                }
            },
            Pagination::Url => {
                let url = Pagination::page_url(self.profile.list_url, page);
                self.session.goto(&url).await?;
                wait::for_ready(
                    self.session,
                    self.timeouts.navigation,
                    self.timeouts.poll_interval,
                )
                .await
            }
        }
    }

    /// ページ番号リンクをクリックして移動
    ///
    /// クリックは遷移の開始前に戻るため、一覧の内容が変わるまで待つ。
    async fn click_page_link(&self, page: u32) -> Result<(), ScraperError> {
        let text = page.to_string();
        let t = self.timeouts;

        wait::for_link(self.session, &text, t.clickable, t.poll_interval).await?;
        let before = self.session.content().await?;
        self.session.click_link(&text).await?;
        wait::for_content_change(self.session, &before, t.navigation, t.poll_interval).await?;
        wait::for_ready(self.session, t.navigation, t.poll_interval).await?;
        wait::for_selector(
            self.session,
            self.profile.list.container,
            t.navigation,
            t.poll_interval,
        )
        .await
    }

    /// ページ変更スクリプトを直接呼んで移動
    async fn jump(&self, call: &str, page: u32) -> Result<(), ScraperError> {
        let t = self.timeouts;
        let before = self.session.content().await?;

        self.session
            .evaluate(&Pagination::jump_script(call, page))
            .await?;
        wait::for_content_change(self.session, &before, t.navigation, t.poll_interval).await?;
        wait::for_selector(
            self.session,
            self.profile.list.container,
            t.navigation,
            t.poll_interval,
        )
        .await?;

        info!("Jumped to page {}", page);
        Ok(())
    }

    async fn process_page(
        &self,
        page: u32,
        records: &mut RecordCollection,
    ) -> Result<(), ScraperError> {
        wait::for_selector(
            self.session,
            self.profile.list.container,
            self.timeouts.list,
            self.timeouts.poll_interval,
        )
        .await?;

        match self.profile.rows {
            RowMode::Detail { .. } => self.process_detail_rows(page, records).await,
            RowMode::Inline { table, min_cells } => {
                let html = self.session.content().await?;
                let rows = extract::inline_rows(&html, table, min_cells)?;
                if rows.is_empty() {
                    info!("[page {}] No rows on this page", page);
                    return Ok(());
                }

                let fields = self.profile.fields;
                for cells in rows {
                    let record = Record::from_pairs(fields, fields.iter().copied().zip(cells));
                    records.push(record);
                }
                Ok(())
            }
        }
    }

    async fn process_detail_rows(
        &self,
        page: u32,
        records: &mut RecordCollection,
    ) -> Result<(), ScraperError> {
        let count = self.session.count(self.profile.list.rows).await?;
        if count == 0 {
            info!("[page {}] No rows on this page", page);
            return Ok(());
        }
        debug!("[page {}] {} rows", page, count);

        for index in 0..count {
            let mut left_list = false;

            match self.visit_detail(index, &mut left_list).await {
                Ok(Some(record)) => {
                    debug!(
                        "[page {}] Collected: {}",
                        page,
                        serde_json::to_string(&record).unwrap_or_default()
                    );
                    records.push(record);
                    if let Err(e) = self.return_to_list(true).await {
                        warn!(
                            "[page {}] Failed to return to list (index={}): {}",
                            page, index, e
                        );
                    }
                }
                Ok(None) => {
                    info!("[page {}] No detail table (index={}), skipped", page, index);
                    if let Err(e) = self.return_to_list(true).await {
                        warn!(
                            "[page {}] Failed to return to list (index={}): {}",
                            page, index, e
                        );
                    }
                }
                Err(e) => {
                    warn!("[page {}] Detail failed (index={}): {}", page, index, e);
                    if left_list {
                        if let Err(e) = self.return_to_list(false).await {
                            warn!(
                                "[page {}] Recovery to list failed (index={}): {}",
                                page, index, e
                            );
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// 一覧の `index` 行目を読み、詳細ページを開いて抽出する
    ///
    /// 詳細ページに抽出対象のテーブルがなければ `Ok(None)`。
    async fn visit_detail(
        &self,
        index: usize,
        left_list: &mut bool,
    ) -> Result<Option<Record>, ScraperError> {
        let RowMode::Detail {
            list_fields,
            trigger,
            click,
            marker,
            table,
        } = self.profile.rows
        else {
            return Ok(None);
        };
        let rows = self.profile.list.rows;
        let t = self.timeouts;

        let mut pairs: Vec<(&'static str, String)> = Vec::with_capacity(self.profile.fields.len());
        for list_field in list_fields {
            let text = self
                .session
                .text_at(rows, index, list_field.selector)
                .await?;
            pairs.push((list_field.field, extract::collapse_whitespace(&text)));
        }

        wait::for_selector(self.session, rows, t.clickable, t.poll_interval).await?;
        *left_list = true;
        self.session.click_at(rows, index, trigger, click).await?;

        wait::for_selector(self.session, marker, t.detail, t.poll_interval).await?;
        let html = self.session.content().await?;

        let Some(detail) = extract::extract(&html, &table) else {
            return Ok(None);
        };
        pairs.extend(detail);

        Ok(Some(Record::from_pairs(self.profile.fields, pairs)))
    }

    /// 一覧へ戻る
    ///
    /// `force` が false の場合、一覧がまだ表示されていれば何もしない。
    async fn return_to_list(&self, force: bool) -> Result<(), ScraperError> {
        let container = self.profile.list.container;
        if !force && self.session.count(container).await.unwrap_or(0) > 0 {
            return Ok(());
        }

        self.session.go_back().await?;
        wait::for_selector(
            self.session,
            container,
            self.timeouts.list,
            self.timeouts.poll_interval,
        )
        .await
    }
}

//! テスト用のインメモリ BrowserSession

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ScraperError;
use crate::traits::{BrowserSession, ClickMode};

use super::types::{Pagination, RowMode, SiteProfile};

#[derive(Debug, Clone, Default)]
pub struct MockRow {
    /// 一覧行の (内側セレクタ, テキスト)
    pub list: Vec<(&'static str, &'static str)>,
    /// 一覧テーブルのセル（Inline 用）
    pub cells: Vec<&'static str>,
    /// 詳細ページのHTML
    pub detail: String,
    pub fail_click: bool,
    /// false なら詳細ページのマーカー要素が現れない
    pub detail_never_ready: bool,
}

impl MockRow {
    pub fn detail(list: Vec<(&'static str, &'static str)>, detail: impl Into<String>) -> Self {
        Self {
            list,
            detail: detail.into(),
            ..Default::default()
        }
    }

    pub fn cells(cells: Vec<&'static str>) -> Self {
        Self {
            cells,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Blank,
    List(u32),
    Detail(u32, usize),
}

#[derive(Debug)]
struct State {
    view: View,
    /// クリック済みでまだ反映されていないページ遷移 (ページ, 残りポーリング回数)
    pending: Option<(u32, usize)>,
    log: Vec<String>,
    closed: bool,
}

pub struct MockSession {
    profile: &'static SiteProfile,
    pages: HashMap<u32, Vec<MockRow>>,
    broken_links: HashSet<u32>,
    broken_jumps: HashSet<u32>,
    broken_urls: HashSet<u32>,
    missing_containers: HashSet<u32>,
    bare_pages: HashSet<u32>,
    click_delay: usize,
    unreachable: bool,
    state: Mutex<State>,
}

impl MockSession {
    pub fn new(profile: &'static SiteProfile) -> Self {
        Self {
            profile,
            pages: HashMap::new(),
            broken_links: HashSet::new(),
            broken_jumps: HashSet::new(),
            broken_urls: HashSet::new(),
            missing_containers: HashSet::new(),
            bare_pages: HashSet::new(),
            click_delay: 0,
            unreachable: false,
            state: Mutex::new(State {
                view: View::Blank,
                pending: None,
                log: Vec::new(),
                closed: false,
            }),
        }
    }

    pub fn with_page(mut self, page: u32, rows: Vec<MockRow>) -> Self {
        self.pages.insert(page, rows);
        self
    }

    pub fn with_broken_link(mut self, page: u32) -> Self {
        self.broken_links.insert(page);
        self
    }

    pub fn with_broken_jump(mut self, page: u32) -> Self {
        self.broken_jumps.insert(page);
        self
    }

    /// このページのURLへの遷移を失敗させる
    pub fn with_broken_url(mut self, page: u32) -> Self {
        self.broken_urls.insert(page);
        self
    }

    /// 一覧コンテナが現れないページ
    pub fn with_missing_container(mut self, page: u32) -> Self {
        self.missing_containers.insert(page);
        self
    }

    /// コンテナはあるがテーブルのないページ
    pub fn with_bare_page(mut self, page: u32) -> Self {
        self.bare_pages.insert(page);
        self
    }

    /// ページリンクのクリック後、`polls` 回のポーリングを経てから遷移する
    pub fn with_click_delay(mut self, polls: usize) -> Self {
        self.click_delay = polls;
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// 実行された操作の記録
    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    pub fn is_on_list(&self) -> bool {
        matches!(self.state.lock().unwrap().view, View::List(_))
    }

    fn view(&self) -> View {
        self.state.lock().unwrap().view
    }

    fn set_view(&self, view: View, entry: String) {
        let mut state = self.state.lock().unwrap();
        state.view = view;
        state.log.push(entry);
    }

    /// ポーリング1回分だけ時間を進め、保留中の遷移を反映する
    fn tick(&self) {
        let mut state = self.state.lock().unwrap();
        let pending = state.pending;
        match pending {
            Some((page, remaining)) if remaining <= 1 => {
                state.pending = None;
                state.view = View::List(page);
                state.log.push(format!("navigated {}", page));
            }
            Some((page, remaining)) => state.pending = Some((page, remaining - 1)),
            None => {}
        }
    }

    fn rows(&self, page: u32) -> &[MockRow] {
        self.pages.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    fn marker(&self) -> &'static str {
        match self.profile.rows {
            RowMode::Detail { marker, .. } => marker,
            RowMode::Inline { .. } => "",
        }
    }

    fn jump_call(&self) -> Option<&'static str> {
        match self.profile.pagination {
            Pagination::Script { call } => Some(call),
            Pagination::Url => None,
        }
    }

    fn list_html(&self, page: u32) -> String {
        if self.bare_pages.contains(&page) {
            return format!(
                "<div class=\"list_table\" data-page=\"{}\"><p>no results</p></div>",
                page
            );
        }
        let body: String = self
            .rows(page)
            .iter()
            .map(|row| {
                let cells: String = row
                    .cells
                    .iter()
                    .map(|cell| format!("<td>{}</td>", cell))
                    .collect();
                format!("<tr>{}</tr>", cells)
            })
            .collect();
        format!(
            "<div class=\"list_table\" data-page=\"{}\"><table><tbody>{}</tbody></table></div>",
            page, body
        )
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn goto(&self, url: &str) -> Result<(), ScraperError> {
        if self.unreachable {
            return Err(ScraperError::Navigation(format!("unreachable: {}", url)));
        }
        let page = url
            .split("page=")
            .nth(1)
            .and_then(|p| p.parse().ok())
            .unwrap_or(1);
        if self.broken_urls.contains(&page) {
            return Err(ScraperError::Navigation(format!("load failed: {}", url)));
        }
        self.set_view(View::List(page), format!("goto {}", url));
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<Value, ScraperError> {
        if script == "document.readyState" {
            self.tick();
            return Ok(json!("complete"));
        }

        if let Some(call) = self.jump_call() {
            if let Some(arg) = script.strip_prefix(call).and_then(|s| s.strip_prefix("('")) {
                let page: u32 = arg
                    .trim_end_matches("')")
                    .parse()
                    .map_err(|_| ScraperError::JavaScript(script.to_string()))?;
                if self.broken_jumps.contains(&page) {
                    return Err(ScraperError::JavaScript(format!("{} failed", script)));
                }
                self.set_view(View::List(page), format!("jump {}", page));
            }
        }
        Ok(Value::Null)
    }

    async fn content(&self) -> Result<String, ScraperError> {
        self.tick();
        Ok(match self.view() {
            View::Blank => String::new(),
            View::List(page) => self.list_html(page),
            View::Detail(page, index) => self.rows(page)[index].detail.clone(),
        })
    }

    async fn count(&self, selector: &str) -> Result<usize, ScraperError> {
        self.tick();
        let list = self.profile.list;
        Ok(match self.view() {
            View::List(page) if selector == list.container => {
                usize::from(!self.missing_containers.contains(&page))
            }
            View::List(page) if selector == list.rows => self.rows(page).len(),
            View::Detail(page, index) if selector == self.marker() => {
                usize::from(!self.rows(page)[index].detail_never_ready)
            }
            _ => 0,
        })
    }

    async fn text_at(
        &self,
        selector: &str,
        index: usize,
        inner: &str,
    ) -> Result<String, ScraperError> {
        let View::List(page) = self.view() else {
            return Err(ScraperError::ElementNotFound(selector.to_string()));
        };
        self.rows(page)
            .get(index)
            .and_then(|row| row.list.iter().find(|(sel, _)| *sel == inner))
            .map(|(_, text)| text.to_string())
            .ok_or_else(|| ScraperError::ElementNotFound(format!("{} >> {}", selector, inner)))
    }

    async fn click_at(
        &self,
        selector: &str,
        index: usize,
        _inner: Option<&str>,
        _mode: ClickMode,
    ) -> Result<(), ScraperError> {
        let View::List(page) = self.view() else {
            return Err(ScraperError::ElementNotFound(selector.to_string()));
        };
        let row = self
            .rows(page)
            .get(index)
            .ok_or_else(|| ScraperError::ElementNotFound(format!("{}[{}]", selector, index)))?;
        if row.fail_click {
            return Err(ScraperError::ElementNotFound("detail trigger".to_string()));
        }
        self.set_view(
            View::Detail(page, index),
            format!("detail {}/{}", page, index),
        );
        Ok(())
    }

    async fn has_link(&self, text: &str) -> Result<bool, ScraperError> {
        let View::List(current) = self.view() else {
            return Ok(false);
        };
        Ok(match text.parse::<u32>() {
            Ok(page) => {
                page != current
                    && self.pages.contains_key(&page)
                    && !self.broken_links.contains(&page)
            }
            Err(_) => false,
        })
    }

    async fn click_link(&self, text: &str) -> Result<(), ScraperError> {
        if !self.has_link(text).await? {
            return Err(ScraperError::ElementNotFound(format!("link {}", text)));
        }
        let page: u32 = text
            .parse()
            .map_err(|_| ScraperError::ElementNotFound(format!("link {}", text)))?;
        if self.click_delay == 0 {
            self.set_view(View::List(page), format!("click {}", page));
        } else {
            let mut state = self.state.lock().unwrap();
            state.pending = Some((page, self.click_delay));
            state.log.push(format!("click {}", page));
        }
        Ok(())
    }

    async fn go_back(&self) -> Result<(), ScraperError> {
        match self.view() {
            View::Detail(page, _) => self.set_view(View::List(page), "back".to_string()),
            _ => self.set_view(View::Blank, "back from list".to_string()),
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}

use async_trait::async_trait;

use crate::error::ScraperError;
use crate::record::RecordCollection;

/// 要素のクリック方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickMode {
    /// 入力イベントによる通常クリック
    Native,
    /// `element.click()` をスクリプトで呼ぶ
    Script,
}

/// クローラーが必要とするブラウザ操作
///
/// 要素は常に「セレクタ + インデックス」で指定する。ナビゲーションを挟んで
/// 要素ハンドルを保持しないため、呼び出しごとに一覧を引き直す。
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// URLへ遷移
    async fn goto(&self, url: &str) -> Result<(), ScraperError>;

    /// スクリプトを実行し、戻り値をJSONで返す（undefined は Null）
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, ScraperError>;

    /// 現在のレンダリング済みHTML
    async fn content(&self) -> Result<String, ScraperError>;

    /// セレクタに一致する要素数
    async fn count(&self, selector: &str) -> Result<usize, ScraperError>;

    /// `selector` の `index` 番目の要素内で `inner` に一致する要素のテキスト
    async fn text_at(
        &self,
        selector: &str,
        index: usize,
        inner: &str,
    ) -> Result<String, ScraperError>;

    /// `selector` の `index` 番目の要素（`inner` 指定時はその内側の要素）をクリック
    async fn click_at(
        &self,
        selector: &str,
        index: usize,
        inner: Option<&str>,
        mode: ClickMode,
    ) -> Result<(), ScraperError>;

    /// テキストが完全一致し、クリック可能（表示中）なリンクが存在するか
    async fn has_link(&self, text: &str) -> Result<bool, ScraperError>;

    /// テキストが完全一致するリンクをクリック
    async fn click_link(&self, text: &str) -> Result<(), ScraperError>;

    /// 履歴を1つ戻る
    async fn go_back(&self) -> Result<(), ScraperError>;

    /// リソース解放
    async fn close(&mut self) -> Result<(), ScraperError>;

    async fn ready_state(&self) -> Result<String, ScraperError> {
        let value = self.evaluate("document.readyState").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}

#[async_trait]
pub trait Scraper: Send + Sync {
    /// ブラウザ初期化
    async fn initialize(&mut self) -> Result<(), ScraperError>;

    /// ページ範囲を巡回してレコードを収集
    async fn crawl(&mut self) -> Result<RecordCollection, ScraperError>;

    /// リソース解放
    async fn close(&mut self) -> Result<(), ScraperError>;

    /// 一括実行（initialize → crawl → close）
    ///
    /// close は crawl の成否に関わらず必ず呼ばれる。
    async fn execute(&mut self) -> Result<RecordCollection, ScraperError> {
        let result = match self.initialize().await {
            Ok(()) => self.crawl().await,
            Err(e) => Err(e),
        };

        if let Err(e) = self.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }

        result
    }
}

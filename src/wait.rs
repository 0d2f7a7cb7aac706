//! 上限付きポーリング待機

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::debug;

use crate::error::ScraperError;
use crate::traits::BrowserSession;

/// 条件が真になるまでポーリングする
///
/// 条件評価のエラーは「未達」として扱い、タイムアウト時のメッセージに最後の
/// エラーを含める。
pub async fn until<F, Fut>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    mut condition: F,
) -> Result<(), ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, ScraperError>>,
{
    let start = Instant::now();
    let mut last_error: Option<String> = None;

    loop {
        match condition().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => {
                debug!("Wait condition '{}' check error: {}", what, e);
                last_error = Some(e.to_string());
            }
        }

        if start.elapsed() >= timeout {
            return Err(ScraperError::Timeout(match last_error {
                Some(e) => format!("{} not met within {:?} (last error: {})", what, timeout, e),
                None => format!("{} not met within {:?}", what, timeout),
            }));
        }

        sleep(interval).await;
    }
}

/// `document.readyState == "complete"` を待つ
pub async fn for_ready<S: BrowserSession + ?Sized>(
    session: &S,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ScraperError> {
    until("document ready", timeout, interval, move || async move {
        Ok(session.ready_state().await? == "complete")
    })
    .await
}

/// セレクタに一致する要素の出現を待つ
pub async fn for_selector<S: BrowserSession + ?Sized>(
    session: &S,
    selector: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ScraperError> {
    let what = format!("element '{}'", selector);
    until(&what, timeout, interval, move || async move {
        Ok(session.count(selector).await? > 0)
    })
    .await
}

/// テキスト一致のリンクの出現を待つ
pub async fn for_link<S: BrowserSession + ?Sized>(
    session: &S,
    text: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ScraperError> {
    let what = format!("link '{}'", text);
    until(&what, timeout, interval, move || async move {
        session.has_link(text).await
    })
    .await
}

/// レンダリング内容が `before` から変わるのを待つ
pub async fn for_content_change<S: BrowserSession + ?Sized>(
    session: &S,
    before: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ScraperError> {
    until("content change", timeout, interval, move || async move {
        Ok(session.content().await? != before)
    })
    .await
}

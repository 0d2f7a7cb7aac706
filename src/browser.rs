//! chromiumoxide による BrowserSession 実装

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::{BrowserSession, ClickMode};

/// Chrome の1タブを操作するセッション
pub struct ChromeSession {
    browser: Option<Browser>,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    /// ブラウザを起動して空のタブを開く
    pub async fn launch(config: &ScraperConfig) -> Result<Self, ScraperError> {
        info!("Launching browser (headless={})...", config.headless);

        let mut builder = BrowserConfig::builder()
            .window_size(1280, 800)
            .no_sandbox()
            .request_timeout(Duration::from_secs(60))
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(path) = config.resolve_chrome_path() {
            builder = builder.chrome_executable(path);
        }

        let browser_config = builder
            .build()
            .map_err(|e| ScraperError::BrowserInit(format!("ブラウザ設定エラー: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // ブラウザイベントハンドラをバックグラウンドで実行
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        info!("Browser launched");
        Ok(Self {
            browser: Some(browser),
            page,
            handler,
        })
    }

    async fn element_at(&self, selector: &str, index: usize) -> Result<Element, ScraperError> {
        let mut elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| ScraperError::ElementNotFound(format!("{}: {}", selector, e)))?;

        if index >= elements.len() {
            return Err(ScraperError::ElementNotFound(format!(
                "{}[{}] (found {})",
                selector,
                index,
                elements.len()
            )));
        }
        Ok(elements.swap_remove(index))
    }

    /// テキストが一致し、表示されているリンクの `a` 要素中の位置
    async fn link_index(&self, text: &str) -> Result<Option<usize>, ScraperError> {
        let value = self.evaluate(&link_index_script(text)?).await?;
        Ok(value.as_u64().map(|index| index as usize))
    }
}

/// 表示中でテキストが一致する最初のリンクの位置を返すスクリプト（なければ -1）
fn link_index_script(text: &str) -> Result<String, ScraperError> {
    let literal =
        serde_json::to_string(text).map_err(|e| ScraperError::JavaScript(e.to_string()))?;
    Ok(format!(
        "Array.from(document.querySelectorAll('a')).findIndex(\
         a => a.innerText.trim() === {} && a.offsetParent !== null)",
        literal
    ))
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn goto(&self, url: &str) -> Result<(), ScraperError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ScraperError::Navigation(format!("{}: {}", url, e)))?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, ScraperError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn content(&self) -> Result<String, ScraperError> {
        self.page
            .content()
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))
    }

    async fn count(&self, selector: &str) -> Result<usize, ScraperError> {
        let literal = serde_json::to_string(selector)
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        let value = self
            .evaluate(&format!("document.querySelectorAll({}).length", literal))
            .await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    async fn text_at(
        &self,
        selector: &str,
        index: usize,
        inner: &str,
    ) -> Result<String, ScraperError> {
        let element = self
            .element_at(selector, index)
            .await?
            .find_element(inner)
            .await
            .map_err(|e| ScraperError::ElementNotFound(format!("{} >> {}: {}", selector, inner, e)))?;

        let text = element
            .inner_text()
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        Ok(text.unwrap_or_default())
    }

    async fn click_at(
        &self,
        selector: &str,
        index: usize,
        inner: Option<&str>,
        mode: ClickMode,
    ) -> Result<(), ScraperError> {
        let row = self.element_at(selector, index).await?;
        let target = match inner {
            Some(inner) => row.find_element(inner).await.map_err(|e| {
                ScraperError::ElementNotFound(format!("{} >> {}: {}", selector, inner, e))
            })?,
            None => row,
        };

        match mode {
            ClickMode::Native => {
                target
                    .click()
                    .await
                    .map_err(|e| ScraperError::Navigation(format!("click: {}", e)))?;
            }
            ClickMode::Script => {
                target
                    .call_js_fn("function() { this.click(); }", false)
                    .await
                    .map_err(|e| ScraperError::JavaScript(format!("click: {}", e)))?;
            }
        }
        Ok(())
    }

    async fn has_link(&self, text: &str) -> Result<bool, ScraperError> {
        Ok(self.link_index(text).await?.is_some())
    }

    async fn click_link(&self, text: &str) -> Result<(), ScraperError> {
        let index = self
            .link_index(text)
            .await?
            .ok_or_else(|| ScraperError::ElementNotFound(format!("link '{}'", text)))?;
        let link = self.element_at("a", index).await?;
        link.click()
            .await
            .map_err(|e| ScraperError::Navigation(format!("link '{}': {}", text, e)))?;
        Ok(())
    }

    async fn go_back(&self) -> Result<(), ScraperError> {
        self.evaluate("history.back()").await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        info!("ブラウザを終了中...");

        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                debug!("Browser close failed: {}", e);
            }
            if let Err(e) = browser.wait().await {
                debug!("Browser wait failed: {}", e);
            }
        }
        self.handler.abort();

        info!("ブラウザ終了完了");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_index_script_requires_visible_link() {
        let script = link_index_script("12").unwrap();
        assert!(script.contains(r#"a.innerText.trim() === "12""#));
        assert!(script.contains("a.offsetParent !== null"));
        assert!(!script.contains('\\'));
    }

    #[test]
    fn test_link_index_script_escapes_text() {
        let script = link_index_script(r#"다음" || true"#).unwrap();
        assert!(script.contains(r#"=== "다음\" || true""#));
    }
}

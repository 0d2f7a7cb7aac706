use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ScraperError;

/// 巡回するページ範囲（両端を含む）
///
/// `start > end` は空の範囲として扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// ページ番号は1以上
    pub fn new(start: u32, end: u32) -> Result<Self, ScraperError> {
        if start == 0 || end == 0 {
            return Err(ScraperError::Config(format!(
                "page numbers start at 1 (got {}..={})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

/// 待機条件ごとのタイムアウト
#[derive(Debug, Clone)]
pub struct Timeouts {
    /// ページ送り・初期ロード
    pub navigation: Duration,
    /// 一覧コンテナの出現
    pub list: Duration,
    /// 詳細ページのマーカー要素
    pub detail: Duration,
    /// クリック対象の出現
    pub clickable: Duration,
    /// ポーリング間隔
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(30),
            list: Duration::from_secs(20),
            detail: Duration::from_secs(30),
            clickable: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
        }
    }
}

impl Timeouts {
    /// 全ての待機を同じ上限にする（テスト用の短い設定など）
    pub fn uniform(limit: Duration, poll_interval: Duration) -> Self {
        Self {
            navigation: limit,
            list: limit,
            detail: limit,
            clickable: limit,
            poll_interval,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub range: PageRange,
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// 指定時は `output_dir` とファイル名の自動生成を無視する
    pub output_path: Option<PathBuf>,
    pub timeouts: Timeouts,
}

impl ScraperConfig {
    pub fn new(range: PageRange) -> Self {
        Self {
            range,
            headless: true,
            chrome_path: None,
            output_dir: PathBuf::from("."),
            output_path: None,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Chrome 実行ファイル: 明示指定 → CHROME_PATH → CHROMIUM_PATH
    pub fn resolve_chrome_path(&self) -> Option<PathBuf> {
        self.chrome_path.clone().or_else(|| {
            std::env::var("CHROME_PATH")
                .or_else(|_| std::env::var("CHROMIUM_PATH"))
                .ok()
                .map(PathBuf::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_range_rejects_zero() {
        assert!(PageRange::new(0, 3).is_err());
        assert!(PageRange::new(1, 0).is_err());
    }

    #[test]
    fn test_page_range_reversed_is_empty() {
        let range = PageRange::new(5, 2).unwrap();
        assert!(range.is_empty());
        assert_eq!(range.pages().count(), 0);

        let range = PageRange::new(3, 4).unwrap();
        assert!(!range.is_empty());
        assert_eq!(range.pages().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_config_builder() {
        let config = ScraperConfig::new(PageRange::new(1, 57).unwrap())
            .with_headless(false)
            .with_output_dir("/tmp/out")
            .with_chrome_path("/usr/bin/chromium")
            .with_timeouts(Timeouts::uniform(
                Duration::from_secs(5),
                Duration::from_millis(100),
            ));

        assert!(!config.headless);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.output_path, None);
        assert_eq!(
            config.resolve_chrome_path(),
            Some(PathBuf::from("/usr/bin/chromium"))
        );
        assert_eq!(config.timeouts.detail, Duration::from_secs(5));
        assert_eq!(config.timeouts.poll_interval, Duration::from_millis(100));
    }
}

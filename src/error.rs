use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("ブラウザ初期化エラー: {0}")]
    BrowserInit(String),

    #[error("ナビゲーションエラー: {0}")]
    Navigation(String),

    #[error("タイムアウト: {0}")]
    Timeout(String),

    #[error("要素が見つかりません: {0}")]
    ElementNotFound(String),

    #[error("JavaScript実行エラー: {0}")]
    JavaScript(String),

    #[error("抽出エラー: {0}")]
    Extraction(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),

    #[error("CSV出力エラー: {0}")]
    Csv(#[from] csv::Error),
}

impl ScraperError {
    /// タイムアウト系のエラーか
    pub fn is_timeout(&self) -> bool {
        matches!(self, ScraperError::Timeout(_))
    }
}

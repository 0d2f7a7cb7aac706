//! ページ送り付きクローラー
//!
//! 一覧ページを1ページずつ進め、各行の詳細ページを開いてフィールドを抽出し、
//! 一覧へ戻る。ページ送りはリンククリックを優先し、失敗時はサイトの
//! ページ変更スクリプトを直接呼ぶ。

mod driver;
mod types;

#[cfg(test)]
mod mock;

pub use driver::CrawlDriver;
pub use types::{ListField, ListLayout, Pagination, RowMode, SiteProfile};

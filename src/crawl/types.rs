//! サイトプロファイルの型定義

use crate::extract::FieldTable;
use crate::record::FieldList;
use crate::traits::ClickMode;

/// ページ送りの方式
#[derive(Debug, Clone, Copy)]
pub enum Pagination {
    /// ページ番号リンクのクリック、失敗時はスクリプト関数で直接ジャンプ
    ///
    /// `call` はページ番号1つを受け取る関数名（例: `goPage`）。
    Script { call: &'static str },
    /// `list_url` の `{page}` をページ番号に置き換えたURLへ直接遷移
    Url,
}

impl Pagination {
    /// 直接ジャンプ用のスクリプト
    pub fn jump_script(call: &str, page: u32) -> String {
        format!("{}('{}')", call, page)
    }

    pub fn page_url(template: &str, page: u32) -> String {
        template.replace("{page}", &page.to_string())
    }
}

/// 一覧ページの構造
#[derive(Debug, Clone, Copy)]
pub struct ListLayout {
    /// 一覧の表示完了を示す要素
    pub container: &'static str,
    /// 行（詳細へのリンクを持つ要素）
    pub rows: &'static str,
}

/// 一覧行から読むフィールド
#[derive(Debug, Clone, Copy)]
pub struct ListField {
    pub field: &'static str,
    /// 行要素の内側のセレクタ
    pub selector: &'static str,
}

/// 行ごとの処理方式
#[derive(Debug, Clone, Copy)]
pub enum RowMode {
    /// 行ごとに詳細ページを開いて抽出し、一覧へ戻る
    Detail {
        list_fields: &'static [ListField],
        /// 行の内側のクリック対象。`None` なら行要素そのもの
        trigger: Option<&'static str>,
        click: ClickMode,
        /// 詳細ページの表示完了を示す要素
        marker: &'static str,
        table: FieldTable,
    },
    /// 一覧テーブルのセルを位置でフィールドに対応させる
    Inline {
        table: &'static str,
        min_cells: usize,
    },
}

/// 1サイト分のクロール定義
#[derive(Debug, Clone, Copy)]
pub struct SiteProfile {
    /// 出力ファイル名の接頭辞にも使う
    pub name: &'static str,
    /// 初期ロードするURL（`Url` 方式では `{page}` を含む）
    pub list_url: &'static str,
    pub pagination: Pagination,
    pub list: ListLayout,
    pub rows: RowMode,
    pub fields: FieldList,
}

impl SiteProfile {
    /// 初期ロードのURL
    pub fn initial_url(&self, start_page: u32) -> String {
        match self.pagination {
            Pagination::Url => Pagination::page_url(self.list_url, start_page),
            Pagination::Script { .. } => self.list_url.to_string(),
        }
    }
}

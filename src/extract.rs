//! 詳細ページ/一覧テーブルからのフィールド抽出
//!
//! ラベル要素（`th` や `h3` など）を見つけ、その後ろにある値要素のテキストを
//! 読む。サイトごとの違いは [`FieldTable`] の宣言だけで表現する。

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::error::ScraperError;

/// ラベルテキストの照合方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    Exact(&'static str),
    Contains(&'static str),
}

impl TextMatch {
    fn matches(&self, text: &str) -> bool {
        match self {
            TextMatch::Exact(label) => text == *label,
            TextMatch::Contains(label) => text.contains(label),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// `selector` に一致し、テキストが `text` に合う要素
    Label {
        selector: &'static str,
        text: TextMatch,
    },
    /// CSSセレクタに一致する要素
    Selector(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// 一致した要素そのもの
    Itself,
    /// 文書順で後ろにある最初の一致要素。先頭のセレクタから順に試す
    Following(&'static [&'static str]),
}

/// 1フィールド分の抽出ルール
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub matcher: Matcher,
    pub locator: Locator,
    /// 指定時は一致した全要素の値をこの区切りで連結する
    pub join: Option<&'static str>,
}

impl FieldRule {
    /// ラベル要素の直後の `td` を読む
    pub const fn label(field: &'static str, selector: &'static str, text: TextMatch) -> Self {
        Self {
            field,
            matcher: Matcher::Label { selector, text },
            locator: Locator::Following(&["td"]),
            join: None,
        }
    }

    /// セレクタに一致した要素自身を読む
    pub const fn selector(field: &'static str, selector: &'static str) -> Self {
        Self {
            field,
            matcher: Matcher::Selector(selector),
            locator: Locator::Itself,
            join: None,
        }
    }

    pub const fn then(self, selectors: &'static [&'static str]) -> Self {
        Self {
            locator: Locator::Following(selectors),
            ..self
        }
    }

    pub const fn joined(self, separator: &'static str) -> Self {
        Self {
            join: Some(separator),
            ..self
        }
    }
}

/// サイト固有の抽出テーブル
#[derive(Debug, Clone, Copy)]
pub struct FieldTable {
    /// 指定時は最初に一致した要素の内側だけを対象にする
    pub scope: Option<&'static str>,
    pub rules: &'static [FieldRule],
}

/// 連続する空白・改行を1つの空白にまとめ、前後の空白を除く
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 要素内のテキストノードを区切りなしで連結し、空白を畳んだもの
pub fn normalized_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Invalid selector '{}': {:?}", selector, e);
            None
        }
    }
}

/// `anchor` より文書順で後ろにある、`selector` に一致する最初の要素
fn following<'a>(
    scope: ElementRef<'a>,
    anchor: ElementRef<'a>,
    selector: &Selector,
) -> Option<ElementRef<'a>> {
    scope
        .descendants()
        .skip_while(|node| node.id() != anchor.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|element| selector.matches(element))
}

fn matched_elements<'a>(scope: ElementRef<'a>, matcher: &Matcher) -> Vec<ElementRef<'a>> {
    match matcher {
        Matcher::Label { selector, text } => {
            let Some(parsed) = parse_selector(selector) else {
                return Vec::new();
            };
            scope
                .select(&parsed)
                .filter(|element| text.matches(&normalized_text(*element)))
                .collect()
        }
        Matcher::Selector(selector) => {
            let Some(parsed) = parse_selector(selector) else {
                return Vec::new();
            };
            scope.select(&parsed).collect()
        }
    }
}

fn locate<'a>(
    scope: ElementRef<'a>,
    anchor: ElementRef<'a>,
    locator: &Locator,
) -> Option<ElementRef<'a>> {
    match locator {
        Locator::Itself => Some(anchor),
        Locator::Following(selectors) => selectors
            .iter()
            .filter_map(|s| parse_selector(s))
            .find_map(|parsed| following(scope, anchor, &parsed)),
    }
}

fn apply_rule(scope: ElementRef<'_>, rule: &FieldRule) -> Option<String> {
    let anchors = matched_elements(scope, &rule.matcher);

    match rule.join {
        None => {
            let anchor = anchors.into_iter().next()?;
            locate(scope, anchor, &rule.locator).map(normalized_text)
        }
        Some(separator) => {
            let values: Vec<String> = anchors
                .into_iter()
                .filter_map(|anchor| locate(scope, anchor, &rule.locator))
                .map(normalized_text)
                .collect();
            if values.is_empty() {
                None
            } else {
                Some(values.join(separator))
            }
        }
    }
}

/// 抽出テーブルに従って (フィールド名, 値) を取り出す
///
/// ラベルや値要素が見つからないフィールドは結果に含めない。`scope` 指定時に
/// その要素がなければ `None`。
pub fn extract(html: &str, table: &FieldTable) -> Option<Vec<(&'static str, String)>> {
    let document = Html::parse_document(html);

    let scope = match table.scope {
        Some(selector) => {
            let parsed = parse_selector(selector)?;
            let found = document.select(&parsed).next();
            found?
        }
        None => document.root_element(),
    };

    Some(
        table
            .rules
            .iter()
            .filter_map(|rule| apply_rule(scope, rule).map(|value| (rule.field, value)))
            .collect(),
    )
}

/// 一覧テーブル（最初の `table` の `tbody`）の各行のセルテキスト
///
/// セル数が `min_cells` 未満の行は除く。
pub fn inline_rows(
    html: &str,
    table_selector: &str,
    min_cells: usize,
) -> Result<Vec<Vec<String>>, ScraperError> {
    let document = Html::parse_document(html);

    let table_sel = Selector::parse(table_selector)
        .map_err(|e| ScraperError::Extraction(format!("{}: {:?}", table_selector, e)))?;
    let tbody_sel = Selector::parse("tbody")
        .map_err(|e| ScraperError::Extraction(format!("tbody: {:?}", e)))?;
    let row_sel =
        Selector::parse("tr").map_err(|e| ScraperError::Extraction(format!("tr: {:?}", e)))?;
    let cell_sel =
        Selector::parse("td").map_err(|e| ScraperError::Extraction(format!("td: {:?}", e)))?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ScraperError::ElementNotFound(table_selector.to_string()))?;
    let tbody = table
        .select(&tbody_sel)
        .next()
        .ok_or_else(|| ScraperError::ElementNotFound(format!("{} tbody", table_selector)))?;

    let rows = tbody
        .select(&row_sel)
        .map(|row| row.select(&cell_sel).map(normalized_text).collect::<Vec<_>>())
        .filter(|cells| cells.len() >= min_cells)
        .collect();
    Ok(rows)
}

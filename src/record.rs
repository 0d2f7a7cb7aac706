//! 収集レコードの型定義

use serde::ser::{Serialize, SerializeMap, Serializer};

/// サイト固有の固定フィールド列
pub type FieldList = &'static [&'static str];

/// 1件の詳細ページ（または一覧行）から作られるレコード
///
/// フィールド列の全てのキーを必ず持ち、値がない場合は空文字。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: FieldList,
    values: Vec<String>,
}

impl Record {
    /// 全フィールドが空のレコード
    pub fn empty(fields: FieldList) -> Self {
        Self {
            fields,
            values: vec![String::new(); fields.len()],
        }
    }

    /// (フィールド名, 値) の組から作成
    ///
    /// フィールド列にないキーは捨てる。同じキーが複数回来た場合は後勝ち。
    pub fn from_pairs<K, V, I>(fields: FieldList, pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut record = Self::empty(fields);
        for (key, value) in pairs {
            if let Some(pos) = fields.iter().position(|f| *f == key.as_ref()) {
                record.values[pos] = value.into();
            }
        }
        record
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .position(|f| *f == field)
            .map(|pos| self.values[pos].as_str())
    }

    pub fn fields(&self) -> FieldList {
        self.fields
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.fields
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// 1回の実行で集めたレコード列（追加のみ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCollection {
    fields: FieldList,
    records: Vec<Record>,
}

impl RecordCollection {
    pub fn new(fields: FieldList) -> Self {
        Self {
            fields,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: Record) {
        debug_assert_eq!(record.fields(), self.fields);
        self.records.push(record);
    }

    pub fn fields(&self) -> FieldList {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

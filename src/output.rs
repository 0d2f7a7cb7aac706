//! 収集結果のCSV出力

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::error::ScraperError;
use crate::record::RecordCollection;

/// 表計算ソフトでの文字化け防止用
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// `<dir>/<site>_data_<YYYYmmdd_HHMMSS>.csv`
pub fn default_output_path(dir: &Path, site: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("{}_data_{}.csv", site, timestamp))
}

/// BOM + ヘッダー行 + 1レコード1行
pub fn write_csv<W: Write>(mut writer: W, records: &RecordCollection) -> Result<(), ScraperError> {
    writer.write_all(UTF8_BOM)?;

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(records.fields())?;
    for record in records {
        csv.write_record(record.values())?;
    }
    csv.flush()?;
    Ok(())
}

pub fn save_csv(path: &Path, records: &RecordCollection) -> Result<(), ScraperError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_csv(BufWriter::new(file), records)?;
    info!("Saved {} records to {:?}", records.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldList, Record};

    const FIELDS: FieldList = &["업체명", "주소"];

    #[test]
    fn test_csv_has_bom_header_and_rows() {
        let mut records = RecordCollection::new(FIELDS);
        records.push(Record::from_pairs(FIELDS, [("업체명", "가나"), ("주소", "서울, 중구")]));
        records.push(Record::from_pairs(FIELDS, [("업체명", "다라")]));

        let mut buf = Vec::new();
        write_csv(&mut buf, &records).unwrap();

        assert!(buf.starts_with(UTF8_BOM));
        let text = String::from_utf8(buf[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "업체명,주소\n가나,\"서울, 중구\"\n다라,\n");
    }

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("/tmp/out"), "smes_clinic");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();

        assert_eq!(path.parent(), Some(Path::new("/tmp/out")));
        assert!(name.starts_with("smes_clinic_data_"));
        assert!(name.ends_with(".csv"));
        // YYYYmmdd_HHMMSS
        assert_eq!(name.len(), "smes_clinic_data_".len() + 15 + ".csv".len());
    }

    #[test]
    fn test_save_csv_creates_directory() {
        let dir = std::env::temp_dir().join(format!("directory-crawler-test-{}", std::process::id()));
        let path = dir.join("nested").join("out.csv");

        let mut records = RecordCollection::new(FIELDS);
        records.push(Record::from_pairs(FIELDS, [("업체명", "가나")]));
        save_csv(&path, &records).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

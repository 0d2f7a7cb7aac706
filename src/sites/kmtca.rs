//! 한국경영기술지도사회 (kmtca.or.kr) の検索一覧
//!
//! 一覧テーブルのセルをそのままレコードにする。詳細ページは開かない。

use crate::crawl::{ListLayout, Pagination, RowMode, SiteProfile};

const TABLE_LIST: ListLayout = ListLayout {
    container: "table tbody",
    rows: "table tbody tr",
};

const FIRM_FIELDS: &[&str] = &["업체명", "대표자명", "주소", "연락처"];

/// 지도사 검색
pub static CONSULTANTS: SiteProfile = SiteProfile {
    name: "kmtca_consultants",
    list_url: "https://www.kmtca.or.kr/?p=145&page={page}",
    pagination: Pagination::Url,
    list: TABLE_LIST,
    rows: RowMode::Inline {
        table: "table",
        min_cells: 6,
    },
    fields: &["구분", "지도분야", "이름", "소속컨설팅사", "E-Mail", "연락처"],
};

/// 컨설팅사 검색
pub static CONSULTING_FIRMS: SiteProfile = SiteProfile {
    name: "kmtca_consulting",
    list_url: "https://www.kmtca.or.kr/?p=146&page={page}",
    pagination: Pagination::Url,
    list: TABLE_LIST,
    rows: RowMode::Inline {
        table: "table",
        min_cells: 4,
    },
    fields: FIRM_FIELDS,
};

/// 기업진단기관 검색（備考列は読まない）
pub static DIAGNOSIS: SiteProfile = SiteProfile {
    name: "kmtca_diagnosis_institutions",
    list_url: "https://www.kmtca.or.kr/?p=147&page={page}",
    pagination: Pagination::Url,
    list: TABLE_LIST,
    rows: RowMode::Inline {
        table: "table",
        min_cells: 4,
    },
    fields: FIRM_FIELDS,
};

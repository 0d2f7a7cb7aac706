//! 중소기업현장지원 (smes.go.kr) の事例・相談ボード

use crate::crawl::{ListField, ListLayout, Pagination, RowMode, SiteProfile};
use crate::extract::{FieldRule, FieldTable, TextMatch};
use crate::traits::ClickMode;

const GO_PAGE: Pagination = Pagination::Script { call: "goPage" };

const LAST_CELL: &[&str] = &["td.tdlast-child"];
const LAST_CELL_OR_ANY: &[&str] = &["td.tdlast-child", "td"];

/// 현장클리닉 사례
pub static CLINIC: SiteProfile = SiteProfile {
    name: "smes_clinic",
    list_url: "https://www.smes.go.kr/bizlink/clinicCase/clinicCaseList.do",
    pagination: GO_PAGE,
    list: ListLayout {
        container: "div.list_table tbody",
        rows: "div.list_table tbody tr",
    },
    rows: RowMode::Detail {
        list_fields: &[ListField {
            field: "분야",
            selector: "td:nth-child(2)",
        }],
        trigger: Some("td.text_left[onclick^='javascript:goView']"),
        click: ClickMode::Script,
        marker: "div.view_table",
        table: FieldTable {
            scope: None,
            rules: &[
                FieldRule::label("테마", "th", TextMatch::Contains("테마")),
                FieldRule::label("수행 전", "th", TextMatch::Exact("수행 전")).then(LAST_CELL),
                FieldRule::label("수행 후", "th", TextMatch::Exact("수행 후")).then(LAST_CELL),
                FieldRule::label("수행내용", "th", TextMatch::Exact("수행내용")).then(LAST_CELL),
                FieldRule::label(
                    "현장클리닉 전***",
                    "th",
                    TextMatch::Contains("현장클리닉 전***"),
                ),
                FieldRule::label(
                    "현장클리닉 후***",
                    "th",
                    TextMatch::Contains("현장클리닉 후***"),
                ),
                FieldRule::label("개선과제", "th", TextMatch::Contains("개선과제"))
                    .then(LAST_CELL_OR_ANY),
                FieldRule::label("해결방안", "th", TextMatch::Contains("해결방안"))
                    .then(LAST_CELL_OR_ANY),
                FieldRule::label(
                    "향후 추진사항 및 사후관리방안",
                    "th",
                    TextMatch::Contains("향후 추진사항 및 사후관리방안"),
                )
                .then(LAST_CELL_OR_ANY),
                FieldRule::label("특이사항", "h3.h3title", TextMatch::Contains("특이사항"))
                    .then(LAST_CELL_OR_ANY),
                FieldRule::label(
                    "사후관리방안",
                    "h3.h3title",
                    TextMatch::Contains("사후관리방안"),
                )
                .then(&["td.tdlast.tdlast-child"]),
            ],
        },
    },
    fields: &[
        "분야",
        "테마",
        "수행 전",
        "수행 후",
        "수행내용",
        "현장클리닉 전***",
        "현장클리닉 후***",
        "개선과제",
        "해결방안",
        "향후 추진사항 및 사후관리방안",
        "특이사항",
        "사후관리방안",
    ],
};

/// 상담 사례
pub static COUNSELING: SiteProfile = SiteProfile {
    name: "smes_counseling",
    list_url: "https://www.smes.go.kr/bizlink/counselingCase/counselingCaseList.do",
    pagination: GO_PAGE,
    list: ListLayout {
        container: "div.list_table",
        rows: "a[onclick^='javascript:goView']",
    },
    rows: RowMode::Detail {
        list_fields: &[],
        trigger: None,
        click: ClickMode::Native,
        marker: "div.view_table",
        table: FieldTable {
            scope: Some("table"),
            rules: &[
                FieldRule::label("분류", "th", TextMatch::Exact("분류")),
                FieldRule::label("공개여부", "th", TextMatch::Exact("공개여부")),
                FieldRule::label("제목", "th", TextMatch::Exact("제목")),
                FieldRule::label("작성일", "th", TextMatch::Exact("작성일")),
                FieldRule::label("작성자", "th", TextMatch::Exact("작성자")),
                FieldRule::label("조회수", "th", TextMatch::Exact("조회수")),
                FieldRule::label("질문", "th", TextMatch::Exact("질문")),
                FieldRule::label("답변", "th", TextMatch::Exact("답변")),
                FieldRule::label("기업경영***", "th", TextMatch::Exact("기업경영***")),
                FieldRule::label("첨부파일", "th", TextMatch::Exact("첨부파일")),
            ],
        },
    },
    fields: &[
        "분류",
        "공개여부",
        "제목",
        "작성일",
        "작성자",
        "조회수",
        "질문",
        "답변",
        "기업경영***",
        "첨부파일",
    ],
};

/// 기업 애로사항(Q&A) 게시판
pub static PROBLEM: SiteProfile = SiteProfile {
    name: "smes_problem",
    list_url: "https://www.smes.go.kr/bizlink/problem/problemView.do",
    pagination: GO_PAGE,
    list: ListLayout {
        container: "table.tbl-list01 tbody",
        rows: "table.tbl-list01 tbody tr",
    },
    rows: RowMode::Detail {
        list_fields: &[
            ListField {
                field: "분야",
                selector: "td:nth-child(2) strong",
            },
            ListField {
                field: "상담내용",
                selector: "td.al p.fld_q",
            },
        ],
        trigger: Some("td.al a"),
        click: ClickMode::Script,
        marker: "div.question_con",
        table: FieldTable {
            scope: None,
            rules: &[
                FieldRule::selector("질문", "div.question_con pre"),
                FieldRule::selector("답변", "div.reply_con pre").joined("\n\n"),
            ],
        },
    },
    fields: &["분야", "상담내용", "질문", "답변"],
};

//! 対象サイトのプロファイル

mod kmtca;
mod smes;

use clap::ValueEnum;

use crate::crawl::SiteProfile;

pub use kmtca::{
    CONSULTANTS as KMTCA_CONSULTANTS, CONSULTING_FIRMS as KMTCA_CONSULTING_FIRMS,
    DIAGNOSIS as KMTCA_DIAGNOSIS,
};
pub use smes::{CLINIC as SMES_CLINIC, COUNSELING as SMES_COUNSELING, PROBLEM as SMES_PROBLEM};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SiteKind {
    SmesClinic,
    SmesCounseling,
    SmesProblem,
    KmtcaConsultants,
    KmtcaConsultingFirms,
    KmtcaDiagnosis,
}

impl SiteKind {
    pub fn profile(self) -> &'static SiteProfile {
        match self {
            SiteKind::SmesClinic => &SMES_CLINIC,
            SiteKind::SmesCounseling => &SMES_COUNSELING,
            SiteKind::SmesProblem => &SMES_PROBLEM,
            SiteKind::KmtcaConsultants => &KMTCA_CONSULTANTS,
            SiteKind::KmtcaConsultingFirms => &KMTCA_CONSULTING_FIRMS,
            SiteKind::KmtcaDiagnosis => &KMTCA_DIAGNOSIS,
        }
    }
}

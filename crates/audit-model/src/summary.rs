use serde::{Deserialize, Serialize};

use crate::flag::AuditFlag;

/// Per-flag aggregate for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagStat {
    pub flag: AuditFlag,
    pub rows: usize,
    /// Share of all audited rows, 0..=100.
    pub percent: f64,
    pub net_total: f64,
    pub net_avg: f64,
}

/// Outcome of normalizing one pricebook section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionStat {
    pub name: String,
    pub entries: usize,
    pub skipped_rows: usize,
    pub skip_reason: Option<String>,
}

/// Machine-readable summary of a full audit run (`audit_summary.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// RFC 3339 run timestamp. The orchestrator stamps this just before
    /// the summary is written; empty until then.
    pub generated_at: String,
    pub pipeline_version: String,
    pub current_year: i32,
    pub prior_year: i32,
    pub tolerance: f64,
    pub billing_rows: usize,
    pub row_errors: usize,
    pub audited_rows: usize,
    pub review_rows: usize,
    pub correct_rows: usize,
    pub total_net_value: f64,
    /// One stat per flag in display order, zero-count flags included.
    pub flags: Vec<FlagStat>,
    pub pricebook_entries: usize,
    pub sections: Vec<SectionStat>,
}

impl AuditSummary {
    pub fn flag_rows(&self, flag: AuditFlag) -> usize {
        self.flags
            .iter()
            .find(|stat| stat.flag == flag)
            .map_or(0, |stat| stat.rows)
    }
}

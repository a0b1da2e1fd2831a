//! File artifacts for a completed audit run.
//!
//! Four CSV views (full join, needs-review, accepted, row errors), a JSON
//! summary for tooling, and the append-only run history.

mod detail;
mod history;
mod summary;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use audit_model::{AuditSummary, AuditedRow, RowError};

pub use history::{append_run_history, history_line};

/// Paths of everything one run wrote.
#[derive(Debug, Clone)]
pub struct ReportSet {
    pub full: PathBuf,
    pub needs_review: PathBuf,
    pub correct: PathBuf,
    /// Present only when the normalizer collected row errors.
    pub row_errors: Option<PathBuf>,
    pub summary_csv: PathBuf,
    pub summary_json: PathBuf,
}

impl ReportSet {
    /// Written paths in a stable order, for logging.
    pub fn paths(&self) -> Vec<&Path> {
        let mut paths = vec![
            self.full.as_path(),
            self.needs_review.as_path(),
            self.correct.as_path(),
        ];
        if let Some(errors) = &self.row_errors {
            paths.push(errors.as_path());
        }
        paths.push(self.summary_csv.as_path());
        paths.push(self.summary_json.as_path());
        paths
    }
}

pub fn write_reports(
    out_dir: &Path,
    audited: &[AuditedRow],
    row_errors: &[RowError],
    summary: &AuditSummary,
) -> Result<ReportSet> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;

    let context = detail::context_headers(audited);
    let all: Vec<&AuditedRow> = audited.iter().collect();
    let review: Vec<&AuditedRow> = audited
        .iter()
        .filter(|row| row.result.flag.needs_review())
        .collect();
    let correct: Vec<&AuditedRow> = audited
        .iter()
        .filter(|row| !row.result.flag.needs_review())
        .collect();

    let set = ReportSet {
        full: out_dir.join("audit_full.csv"),
        needs_review: out_dir.join("audit_needs_review.csv"),
        correct: out_dir.join("audit_correct.csv"),
        row_errors: (!row_errors.is_empty()).then(|| out_dir.join("row_errors.csv")),
        summary_csv: out_dir.join("audit_summary.csv"),
        summary_json: out_dir.join("audit_summary.json"),
    };

    let years = (summary.prior_year, summary.current_year);
    detail::write_detail_csv(&set.full, &all, &context, years.0, years.1)?;
    detail::write_detail_csv(&set.needs_review, &review, &context, years.0, years.1)?;
    detail::write_detail_csv(&set.correct, &correct, &context, years.0, years.1)?;
    if let Some(path) = &set.row_errors {
        detail::write_row_errors_csv(path, row_errors)?;
    }
    summary::write_summary_csv(&set.summary_csv, summary)?;
    summary::write_summary_json(&set.summary_json, summary)?;

    info!(
        out_dir = %out_dir.display(),
        rows = audited.len(),
        review = review.len(),
        row_errors = row_errors.len(),
        "report artifacts written"
    );
    Ok(set)
}

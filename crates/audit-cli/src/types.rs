//! Result types shared between command orchestration and summary printing.

use std::path::PathBuf;

use audit_model::{AuditSummary, ValidationReport};
use audit_report::ReportSet;

/// Everything a finished audit run produced, for the terminal summary.
#[derive(Debug)]
pub struct RunOutcome {
    /// Where report artifacts were (or would have been) written.
    pub out_dir: PathBuf,
    /// True when no artifacts were written.
    pub dry_run: bool,
    /// The machine-readable run summary.
    pub summary: AuditSummary,
    /// Written artifacts; `None` on a dry run.
    pub reports: Option<ReportSet>,
    /// Validation reports from the normalize and output stages.
    pub validation: Vec<ValidationReport>,
    /// Non-fatal failures collected across stages.
    pub errors: Vec<String>,
    /// True when `errors` is non-empty; drives the process exit code.
    pub has_errors: bool,
}

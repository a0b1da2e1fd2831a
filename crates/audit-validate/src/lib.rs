//! Stage-handoff checks for the audit pipeline.
//!
//! Hard failures (row-count drift, duplicate ids, unexplained flags)
//! return [`audit_model::AuditError`]; data-quality findings accumulate
//! in a [`audit_model::ValidationReport`] so a run can finish and still
//! tell the operator what looked off.

mod checks;
mod output;

pub use checks::{check_blank_cells, check_min_rows, check_raw_currencies};
pub use output::{check_keys, check_row_ids, check_total_net, validate_audit_output};

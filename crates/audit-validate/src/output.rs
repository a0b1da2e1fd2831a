use std::collections::BTreeSet;

use tracing::{debug, warn};

use audit_model::{AuditError, AuditedRow, BillingRow, Result, ValidationReport};

/// Row ids are assigned once during standardization and must stay unique.
pub fn check_row_ids(report: &mut ValidationReport, rows: &[BillingRow]) {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for row in rows {
        if row.row_id == 0 {
            report.push_error("row-ids", format!("row for SKU {} carries id 0", row.sku));
        }
        if !seen.insert(row.row_id) {
            duplicates.insert(row.row_id);
        }
    }
    if !duplicates.is_empty() {
        let ids = duplicates
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        report.push_error("row-ids", format!("duplicate row ids after standardization: {ids}"));
    }
}

pub fn check_keys(report: &mut ValidationReport, rows: &[BillingRow]) {
    for row in rows {
        if row.sku.trim().is_empty() {
            report.push_error(
                "blank-keys",
                format!("row {} has an empty SKU after standardization", row.row_id),
            );
        }
    }
}

/// A zeroed-out export usually means the wrong sheet was ingested.
pub fn check_total_net(report: &mut ValidationReport, audited: &[AuditedRow]) {
    if audited.is_empty() {
        return;
    }
    let total: f64 = audited.iter().map(|row| row.row.net_value).sum();
    if total == 0.0 {
        warn!("total net value across all audited rows is zero");
        report.push_warning("total-net", "total net value across all audited rows is zero");
    }
}

/// Final accounting before reports are written.
///
/// Every source row must be audited or held as a row error, and every
/// audited row must say why it got its flag.
pub fn validate_audit_output(
    audited: &[AuditedRow],
    clean_rows: usize,
    row_errors: usize,
    source_rows: usize,
) -> Result<()> {
    if audited.len() != clean_rows {
        return Err(AuditError::RowCountMismatch {
            stage: "classification".to_string(),
            expected: clean_rows,
            actual: audited.len(),
        });
    }
    if clean_rows + row_errors != source_rows {
        return Err(AuditError::RowCountMismatch {
            stage: "audit output".to_string(),
            expected: source_rows,
            actual: clean_rows + row_errors,
        });
    }
    let unexplained: Vec<usize> = audited
        .iter()
        .filter(|row| row.result.rationale.trim().is_empty())
        .map(|row| row.row.row_id)
        .collect();
    if !unexplained.is_empty() {
        return Err(AuditError::AuditInvariant {
            detail: format!(
                "{} rows carry no rationale (first: row {})",
                unexplained.len(),
                unexplained[0]
            ),
        });
    }
    debug!(
        audited = audited.len(),
        row_errors, source_rows, "audit output accounted for"
    );
    Ok(())
}

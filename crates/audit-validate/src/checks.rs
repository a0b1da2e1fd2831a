use std::collections::BTreeSet;

use tracing::warn;

use audit_ingest::RawTable;
use audit_model::{ValidationReport, parse_currency};

pub fn check_min_rows(report: &mut ValidationReport, label: &str, actual: usize, min: usize) {
    if actual < min {
        report.push_error(
            "min-rows",
            format!("{label} has {actual} data rows (expected at least {min})"),
        );
    }
}

/// Blank cells in a key column become row errors later; surface them early.
pub fn check_blank_cells(report: &mut ValidationReport, table: &RawTable, column: usize, label: &str) {
    let blanks = (0..table.rows.len())
        .filter(|&row| table.cell(row, column).trim().is_empty())
        .count();
    if blanks > 0 {
        warn!(table = %table.name, column = label, blanks, "blank cells in key column");
        report.push_warning(
            "blank-cells",
            format!("{label} column has {blanks} blank cells"),
        );
    }
}

/// Distinct currency cells that will not parse during standardization.
pub fn check_raw_currencies(report: &mut ValidationReport, table: &RawTable, column: usize) {
    let mut unknown = BTreeSet::new();
    for row in 0..table.rows.len() {
        let cell = table.cell(row, column).trim();
        if !cell.is_empty() && parse_currency(cell).is_err() {
            unknown.insert(cell.to_string());
        }
    }
    if !unknown.is_empty() {
        let codes = unknown.into_iter().collect::<Vec<_>>().join(", ");
        warn!(table = %table.name, codes = %codes, "unrecognized currency codes");
        report.push_warning(
            "currency-codes",
            format!("{} currency column has unrecognized codes: {codes}", table.name),
        );
    }
}

//! Row standardization for billing exports.
//!
//! Count-preserving: every data row in the export becomes either a
//! standardized [`BillingRow`] or a [`RowError`]. Nothing is silently
//! dropped, and the split is checked before the result is returned.

use audit_ingest::RawTable;
use audit_model::{AuditError, BillingRow, Result, RowError, parse_currency};
use tracing::{debug, info};

use crate::columns::{BillingColumns, resolve_columns};

/// Tokens that mean "no value" in vendor exports.
const EMPTY_TOKENS: &[&str] = &["", "-", "N/A", "NA", "NONE", "NULL"];

fn is_blank(cell: &str) -> bool {
    let upper = cell.trim().to_uppercase();
    EMPTY_TOKENS.contains(&upper.as_str())
}

/// Numeric cleaner for billing amounts: strips currency symbols and
/// thousands separators, keeps the sign. Credit lines come through
/// negative.
fn clean_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .chars()
        .filter(|c| !matches!(c, '$' | '£' | '€' | ',' | ' '))
        .collect();
    cleaned.parse().ok()
}

/// Outcome of standardizing one export.
#[derive(Debug)]
pub struct BillingNormalization {
    pub rows: Vec<BillingRow>,
    pub row_errors: Vec<RowError>,
}

/// Standardize one data row. `row_index` is 0-based within the data rows;
/// the resulting `row_id` is 1-based and stable for the whole run.
///
/// A blank quantity is a flat charge and standardizes to 0. A blank or
/// unparseable net value is a row error: the audit compares money, and a
/// line without money cannot be audited.
pub fn standardize_row(
    table: &RawTable,
    columns: &BillingColumns,
    row_index: usize,
) -> std::result::Result<BillingRow, RowError> {
    let row_id = row_index + 1;
    let fail = |message: String| RowError { row_id, message };

    let sku = table.cell(row_index, columns.sku).trim().to_uppercase();
    if sku.is_empty() {
        return Err(fail("missing SKU".to_string()));
    }

    let currency_cell = table.cell(row_index, columns.currency);
    if is_blank(currency_cell) {
        return Err(fail("missing currency".to_string()));
    }
    let currency = parse_currency(currency_cell).map_err(|err| fail(err.to_string()))?;

    let quantity_cell = table.cell(row_index, columns.quantity);
    let quantity = if is_blank(quantity_cell) {
        0.0
    } else {
        clean_number(quantity_cell)
            .ok_or_else(|| fail(format!("unparseable quantity {quantity_cell:?}")))?
    };

    let net_cell = table.cell(row_index, columns.net_value);
    if is_blank(net_cell) {
        return Err(fail("missing net value".to_string()));
    }
    let net_value =
        clean_number(net_cell).ok_or_else(|| fail(format!("unparseable net value {net_cell:?}")))?;

    let context = columns
        .context
        .iter()
        .map(|(idx, header)| (header.clone(), table.cell(row_index, *idx).to_string()))
        .collect();

    Ok(BillingRow {
        row_id,
        sku,
        currency,
        quantity,
        net_value,
        billed_unit_price: BillingRow::unit_price(quantity, net_value),
        context,
    })
}

/// Standardize a whole export.
///
/// Row errors up to `max_row_errors` are collected and carried through to
/// the reports; one more than that halts the run, since auditing a
/// partially-readable export understates what is owed.
pub fn normalize_billing(table: &RawTable, max_row_errors: usize) -> Result<BillingNormalization> {
    if table.rows.is_empty() {
        return Err(AuditError::EmptyBilling);
    }
    let columns = resolve_columns(table)?;

    let mut rows = Vec::with_capacity(table.rows.len());
    let mut row_errors = Vec::new();
    let mut zero_filled = 0usize;

    for row_index in 0..table.rows.len() {
        match standardize_row(table, &columns, row_index) {
            Ok(row) => {
                if is_blank(table.cell(row_index, columns.quantity)) {
                    zero_filled += 1;
                }
                rows.push(row);
            }
            Err(err) => {
                debug!(row = err.row_id, message = %err.message, "billing row error");
                row_errors.push(err);
            }
        }
    }

    let produced = rows.len() + row_errors.len();
    if produced != table.rows.len() {
        return Err(AuditError::RowCountMismatch {
            stage: "billing normalization".to_string(),
            expected: table.rows.len(),
            actual: produced,
        });
    }
    if row_errors.len() > max_row_errors {
        return Err(AuditError::RowLimit {
            errors: row_errors.len(),
            limit: max_row_errors,
        });
    }

    info!(
        rows = rows.len(),
        row_errors = row_errors.len(),
        blank_quantity_rows = zero_filled,
        "standardized billing export"
    );

    Ok(BillingNormalization { rows, row_errors })
}

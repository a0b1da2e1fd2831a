//! Row-level CSV artifacts: the full join plus the review/accepted splits.

use std::path::Path;

use anyhow::{Context, Result};

use audit_model::{AuditedRow, RowError};

/// Context column names in first-seen order across all rows.
pub(crate) fn context_headers(audited: &[AuditedRow]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in audited {
        for (name, _) in &row.row.context {
            if !headers.iter().any(|header| header == name) {
                headers.push(name.clone());
            }
        }
    }
    headers
}

pub(crate) fn detail_headers(
    context: &[String],
    prior_year: i32,
    current_year: i32,
) -> Vec<String> {
    let mut headers = vec![
        "row_id".to_string(),
        "sku".to_string(),
        "quantity".to_string(),
        "net_value".to_string(),
        "currency".to_string(),
        "billed_unit_price".to_string(),
    ];
    headers.extend(context.iter().cloned());
    headers.push(format!("price_{prior_year}"));
    headers.push(format!("price_{current_year}"));
    headers.push(format!("variance_vs_{current_year}"));
    headers.push("source_section".to_string());
    headers.push("audit_flag".to_string());
    headers.push("rationale".to_string());
    headers
}

pub(crate) fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn opt_money(value: Option<f64>) -> String {
    value.map(money).unwrap_or_default()
}

fn detail_record(audited: &AuditedRow, context: &[String]) -> Vec<String> {
    let row = &audited.row;
    let result = &audited.result;
    let mut record = vec![
        row.row_id.to_string(),
        row.sku.clone(),
        row.quantity.to_string(),
        money(row.net_value),
        row.currency.to_string(),
        money(row.billed_unit_price),
    ];
    for name in context {
        let value = row
            .context
            .iter()
            .find(|(header, _)| header == name)
            .map(|(_, value)| value.clone())
            .unwrap_or_default();
        record.push(value);
    }
    record.push(opt_money(result.matched_prior_price));
    record.push(opt_money(result.matched_current_price));
    record.push(opt_money(result.variance_vs_current));
    record.push(audited.source_section.clone().unwrap_or_default());
    record.push(result.flag.to_string());
    record.push(result.rationale.clone());
    record
}

pub(crate) fn write_detail_csv(
    path: &Path,
    rows: &[&AuditedRow],
    context: &[String],
    prior_year: i32,
    current_year: i32,
) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer.write_record(detail_headers(context, prior_year, current_year))?;
    for row in rows {
        writer.write_record(detail_record(row, context))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// Excluded rows ride along with every report so nothing vanishes silently.
pub(crate) fn write_row_errors_csv(path: &Path, errors: &[RowError]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer.write_record(["row_id", "error"])?;
    for error in errors {
        writer.write_record([error.row_id.to_string(), error.message.clone()])?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

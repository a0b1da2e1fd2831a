//! Aggregate artifacts: the per-flag summary table and its JSON twin.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use audit_model::AuditSummary;

use crate::detail::money;

pub(crate) fn summary_records(summary: &AuditSummary) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    for stat in &summary.flags {
        records.push(vec![
            stat.flag.to_string(),
            stat.rows.to_string(),
            format!("{:.1}", stat.percent),
            money(stat.net_total),
            money(stat.net_avg),
        ]);
    }
    let percent = if summary.audited_rows == 0 { 0.0 } else { 100.0 };
    let net_avg = if summary.audited_rows == 0 {
        0.0
    } else {
        summary.total_net_value / summary.audited_rows as f64
    };
    records.push(vec![
        "TOTAL".to_string(),
        summary.audited_rows.to_string(),
        format!("{percent:.1}"),
        money(summary.total_net_value),
        money(net_avg),
    ]);
    records
}

pub(crate) fn write_summary_csv(path: &Path, summary: &AuditSummary) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer.write_record(["audit_flag", "rows", "percent_of_rows", "net_total", "net_avg"])?;
    for record in summary_records(summary) {
        writer.write_record(record)?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

pub(crate) fn write_summary_json(path: &Path, summary: &AuditSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serialize audit summary")?;
    fs::write(path, json + "\n").with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

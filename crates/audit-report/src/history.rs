//! Append-only run history. One pipe-delimited line per run so drift
//! between months is greppable without opening any report.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use audit_model::{AuditFlag, AuditSummary};

fn grouped_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let fraction = cents % 100;
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (index, digit) in dollars.chars().enumerate() {
        if index > 0 && (dollars.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction:02}")
}

pub fn history_line(summary: &AuditSummary, timestamp: &str) -> String {
    format!(
        "{timestamp} | v{} | billing rows: {} | correct: {} | needs review: {} | old price: {} | no match: {} | custom: {} | row errors: {} | total net: ${}",
        summary.pipeline_version,
        summary.billing_rows,
        summary.correct_rows,
        summary.review_rows,
        summary.flag_rows(AuditFlag::OldPrice2025),
        summary.flag_rows(AuditFlag::NoMatch),
        summary.flag_rows(AuditFlag::CustomPricing),
        summary.row_errors,
        grouped_money(summary.total_net_value),
    )
}

pub fn append_run_history(path: &Path, summary: &AuditSummary) -> Result<()> {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M").to_string();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    writeln!(file, "{}", history_line(summary, &timestamp))
        .with_context(|| format!("append {}", path.display()))?;
    Ok(())
}

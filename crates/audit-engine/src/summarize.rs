//! Aggregation of classified rows into the run summary.

use audit_model::{AuditConfig, AuditFlag, AuditSummary, AuditedRow, FlagStat, SectionStat};

/// Roll a classified batch up into the machine-readable run summary.
///
/// Every flag appears in the output, zero-count flags included, so
/// month-over-month comparisons line up column for column. `generated_at`
/// is left empty; the orchestrator stamps it just before writing.
pub fn summarize(
    audited: &[AuditedRow],
    row_errors: usize,
    config: &AuditConfig,
    pricebook_entries: usize,
    sections: Vec<SectionStat>,
) -> AuditSummary {
    let audited_rows = audited.len();
    let review_rows = audited
        .iter()
        .filter(|row| row.result.flag.needs_review())
        .count();
    let total_net_value: f64 = audited.iter().map(|row| row.row.net_value).sum();

    let flags = AuditFlag::ALL
        .iter()
        .map(|&flag| {
            let mut rows = 0usize;
            let mut net_total = 0.0f64;
            for row in audited.iter().filter(|row| row.result.flag == flag) {
                rows += 1;
                net_total += row.row.net_value;
            }
            FlagStat {
                flag,
                rows,
                percent: if audited_rows == 0 {
                    0.0
                } else {
                    rows as f64 / audited_rows as f64 * 100.0
                },
                net_total,
                net_avg: if rows == 0 { 0.0 } else { net_total / rows as f64 },
            }
        })
        .collect();

    AuditSummary {
        generated_at: String::new(),
        pipeline_version: env!("CARGO_PKG_VERSION").to_string(),
        current_year: config.current_year,
        prior_year: config.prior_year,
        tolerance: config.tolerance,
        billing_rows: audited_rows + row_errors,
        row_errors,
        audited_rows,
        review_rows,
        correct_rows: audited_rows - review_rows,
        total_net_value,
        flags,
        pricebook_entries,
        sections,
    }
}

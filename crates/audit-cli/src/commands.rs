use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::Table;
use tracing::info_span;

use audit_cli::config::{ConfigOverrides, apply_overrides, load_config};
use audit_cli::pipeline::{
    ClassifyResult, IngestResult, NormalizeResult, ReportConfig, ReportResult, classify,
    gate_on_errors, ingest, normalize, report, validate,
};
use audit_model::AuditFlag;

use crate::cli::RunArgs;
use crate::summary::apply_table_style;
use crate::types::RunOutcome;

pub fn run_flags() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Flag", "Review", "Meaning"]);
    apply_table_style(&mut table);
    for flag in AuditFlag::ALL {
        let review = if flag.needs_review() { "yes" } else { "" };
        table.add_row(vec![flag.as_str(), review, flag.description()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_audit(args: &RunArgs) -> Result<RunOutcome> {
    let run_span = info_span!("audit", billing = %args.billing.display());
    let _run_guard = run_span.enter();

    // =========================================================================
    // Stage 0: Configuration - File, CLI overrides, validation
    // =========================================================================
    let mut config = load_config(args.config.as_deref())?;
    let overrides = ConfigOverrides {
        current_year: args.current_year,
        prior_year: args.prior_year,
        tolerance: args.tolerance,
        max_row_errors: args.max_row_errors,
    };
    apply_overrides(&mut config, &overrides);
    config.validate().context("audit configuration")?;
    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("audit_output"));

    // =========================================================================
    // Stage 1: Ingest - Pricebook sections and the billing export
    // =========================================================================
    let IngestResult {
        sections,
        billing,
        errors: ingest_errors,
    } = ingest(&args.pricebook, &args.billing)?;
    let mut errors = ingest_errors;

    // =========================================================================
    // Stage 2: Normalize - Price lookup and standardized billing rows
    // =========================================================================
    let NormalizeResult {
        pricebook,
        rows,
        row_errors,
        report: normalize_report,
    } = normalize(&sections, &billing, &config)?;
    gate_on_errors(&normalize_report)?;

    // =========================================================================
    // Stage 3: Classify - One audit flag per billing row
    // =========================================================================
    let source_rows = rows.len() + row_errors.len();
    let ClassifyResult {
        audited,
        mut summary,
    } = classify(&rows, pricebook, row_errors.len(), &config);

    // =========================================================================
    // Stage 4: Validate - Row accounting and output invariants
    // =========================================================================
    let output_report = validate(&audited, rows.len(), row_errors.len(), source_rows)?;
    gate_on_errors(&output_report)?;

    // =========================================================================
    // Stage 5: Report - Artifacts and run history
    // =========================================================================
    summary.generated_at = Local::now().to_rfc3339();
    let ReportResult {
        reports,
        errors: report_errors,
    } = report(
        &ReportConfig {
            out_dir: &out_dir,
            dry_run: args.dry_run,
            no_history: args.no_history,
        },
        &audited,
        &row_errors,
        &summary,
    )?;
    errors.extend(report_errors);

    let has_errors = !errors.is_empty();
    Ok(RunOutcome {
        out_dir,
        dry_run: args.dry_run,
        summary,
        reports,
        validation: vec![normalize_report, output_report],
        errors,
        has_errors,
    })
}

//! Audit pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read the pricebook section CSVs and the billing export
//! 2. **Normalize**: build the price lookup, standardize billing rows
//! 3. **Classify**: flag every billing row against the lookup
//! 4. **Validate**: row accounting and output invariants
//! 5. **Report**: write report artifacts and the run history line
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span, warn};

use audit_billing::{BillingNormalization, normalize_billing, resolve_columns};
use audit_engine::{AuditClassifier, summarize};
use audit_ingest::{RawTable, list_section_files, read_raw_table, section_name};
use audit_model::{
    AuditConfig, AuditSummary, AuditedRow, BillingRow, RowError, Severity, ValidationReport,
};
use audit_pricebook::{NormalizedPricebook, normalize_pricebook};
use audit_report::{ReportSet, append_run_history, write_reports};
use audit_validate::{
    check_blank_cells, check_keys, check_min_rows, check_raw_currencies, check_row_ids,
    check_total_net, validate_audit_output,
};

/// Run history filename, appended to inside the output directory.
pub const HISTORY_FILE: &str = "run_history.log";

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    /// Raw pricebook sections, one per readable CSV in the directory.
    pub sections: Vec<RawTable>,
    /// The raw billing export.
    pub billing: RawTable,
    /// Section files that could not be read, with the reason.
    pub errors: Vec<String>,
}

/// Read the pricebook directory and the billing export.
///
/// A section file that fails to read is reported and skipped; the billing
/// export is required.
pub fn ingest(pricebook_dir: &Path, billing_path: &Path) -> Result<IngestResult> {
    let ingest_span = info_span!(
        "ingest",
        pricebook = %pricebook_dir.display(),
        billing = %billing_path.display()
    );
    let _ingest_guard = ingest_span.enter();
    let ingest_start = Instant::now();
    let mut errors = Vec::new();

    let files = list_section_files(pricebook_dir).context("list pricebook sections")?;
    if files.is_empty() {
        bail!("no CSV section files in {}", pricebook_dir.display());
    }
    let hints = audit_pricebook::header_hints();
    let mut sections = Vec::with_capacity(files.len());
    for path in &files {
        match read_raw_table(path, &hints) {
            Ok(table) => sections.push(table),
            Err(error) => {
                warn!(section = %section_name(path), %error, "skipping unreadable section file");
                errors.push(format!("{}: {error}", path.display()));
            }
        }
    }

    let billing = read_raw_table(billing_path, &audit_billing::header_hints())
        .with_context(|| format!("read billing export {}", billing_path.display()))?;

    info!(
        sections = sections.len(),
        billing_rows = billing.rows.len(),
        skipped_files = errors.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(IngestResult {
        sections,
        billing,
        errors,
    })
}

// ============================================================================
// Stage 2: Normalize
// ============================================================================

/// Result of the normalize stage.
#[derive(Debug)]
pub struct NormalizeResult {
    /// The canonical price lookup plus per-section stats.
    pub pricebook: NormalizedPricebook,
    /// Standardized billing rows, ids assigned in source order.
    pub rows: Vec<BillingRow>,
    /// Billing rows that could not be standardized.
    pub row_errors: Vec<RowError>,
    /// Data-quality findings from pre-classification checks.
    pub report: ValidationReport,
}

/// Normalize the pricebook sections and the billing export.
///
/// Count-preserving on the billing side: every data row lands in `rows`
/// or `row_errors`. Raw-table quality checks run before standardization
/// so findings point at the export the operator actually has open.
pub fn normalize(
    sections: &[RawTable],
    billing: &RawTable,
    config: &AuditConfig,
) -> Result<NormalizeResult> {
    let normalize_span = info_span!("normalize");
    let _normalize_guard = normalize_span.enter();
    let normalize_start = Instant::now();
    let mut report = ValidationReport::new("normalize");

    let pricebook = normalize_pricebook(sections, config.current_year, config.prior_year)
        .context("normalize pricebook")?;

    let columns = resolve_columns(billing).context("resolve billing columns")?;
    check_blank_cells(&mut report, billing, columns.sku, "SKU");
    check_raw_currencies(&mut report, billing, columns.currency);

    let BillingNormalization { rows, row_errors } =
        normalize_billing(billing, config.max_row_errors).context("normalize billing export")?;
    check_row_ids(&mut report, &rows);
    check_keys(&mut report, &rows);

    info!(
        pricebook_entries = pricebook.lookup.len(),
        billing_rows = rows.len(),
        row_errors = row_errors.len(),
        findings = report.issues.len(),
        duration_ms = normalize_start.elapsed().as_millis(),
        "normalize complete"
    );
    Ok(NormalizeResult {
        pricebook,
        rows,
        row_errors,
        report,
    })
}

// ============================================================================
// Stage 3: Classify
// ============================================================================

/// Result of the classify stage.
#[derive(Debug)]
pub struct ClassifyResult {
    /// One audited row per standardized billing row, same order.
    pub audited: Vec<AuditedRow>,
    /// The machine-readable run summary. `generated_at` is still empty;
    /// the orchestrator stamps it just before reports are written.
    pub summary: AuditSummary,
}

/// Classify every standardized row and roll up the run summary.
pub fn classify(
    rows: &[BillingRow],
    pricebook: NormalizedPricebook,
    row_errors: usize,
    config: &AuditConfig,
) -> ClassifyResult {
    let classify_span = info_span!("classify");
    let _classify_guard = classify_span.enter();
    let classify_start = Instant::now();

    let NormalizedPricebook { lookup, sections } = pricebook;
    let entries = lookup.len();
    let classifier = AuditClassifier::new(Arc::new(lookup), config.clone());
    debug!(rules = ?classifier.rule_names(), "policy order");
    let audited = classifier.classify_all(rows);
    let summary = summarize(&audited, row_errors, config, entries, sections);

    info!(
        rows = audited.len(),
        review = summary.review_rows,
        duration_ms = classify_start.elapsed().as_millis(),
        "classification complete"
    );
    ClassifyResult { audited, summary }
}

// ============================================================================
// Stage 4: Validate
// ============================================================================

/// Row accounting and output invariants after classification.
///
/// Count mismatches and missing rationales are hard failures; an empty or
/// zero-valued audit surfaces through the returned report.
pub fn validate(
    audited: &[AuditedRow],
    clean_rows: usize,
    row_errors: usize,
    source_rows: usize,
) -> Result<ValidationReport> {
    let validate_span = info_span!("validate");
    let _validate_guard = validate_span.enter();
    let validate_start = Instant::now();
    let mut report = ValidationReport::new("audit output");

    validate_audit_output(audited, clean_rows, row_errors, source_rows)?;
    check_min_rows(&mut report, "audited output", audited.len(), 1);
    check_total_net(&mut report, audited);

    info!(
        rows = audited.len(),
        findings = report.issues.len(),
        duration_ms = validate_start.elapsed().as_millis(),
        "output validation complete"
    );
    Ok(report)
}

/// Turn a report's errors into a run-stopping failure.
pub fn gate_on_errors(report: &ValidationReport) -> Result<()> {
    if !report.has_errors() {
        return Ok(());
    }
    let details: Vec<String> = report
        .issues
        .iter()
        .filter(|issue| issue.severity == Severity::Error)
        .map(|issue| format!("{}: {}", issue.check, issue.message))
        .collect();
    bail!("{} validation failed: {}", report.stage, details.join("; "))
}

// ============================================================================
// Stage 5: Report
// ============================================================================

/// Result of the report stage.
#[derive(Debug)]
pub struct ReportResult {
    /// Written artifacts; `None` on a dry run.
    pub reports: Option<ReportSet>,
    /// Failures that did not stop the run.
    pub errors: Vec<String>,
}

/// Report-stage knobs.
pub struct ReportConfig<'a> {
    pub out_dir: &'a Path,
    pub dry_run: bool,
    pub no_history: bool,
}

/// Write the report artifacts and append the run history line.
///
/// A failed history append is reported but does not fail the run; the
/// artifacts are already on disk by then.
pub fn report(
    config: &ReportConfig<'_>,
    audited: &[AuditedRow],
    row_errors: &[RowError],
    summary: &AuditSummary,
) -> Result<ReportResult> {
    let report_span = info_span!("report", out_dir = %config.out_dir.display());
    let _report_guard = report_span.enter();
    let report_start = Instant::now();
    let mut errors = Vec::new();

    if config.dry_run {
        info!(
            rows = audited.len(),
            duration_ms = report_start.elapsed().as_millis(),
            "report skipped (dry run)"
        );
        return Ok(ReportResult {
            reports: None,
            errors,
        });
    }

    let reports = write_reports(config.out_dir, audited, row_errors, summary)?;
    if config.no_history {
        debug!("run history append skipped");
    } else if let Err(error) = append_run_history(&config.out_dir.join(HISTORY_FILE), summary) {
        errors.push(format!("run history: {error}"));
    }

    info!(
        artifacts = reports.paths().len(),
        duration_ms = report_start.elapsed().as_millis(),
        "report complete"
    );
    Ok(ReportResult {
        reports: Some(reports),
        errors,
    })
}

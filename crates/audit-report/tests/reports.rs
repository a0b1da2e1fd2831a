//! End-to-end checks on the written report artifacts.

use std::fs;

use audit_model::{
    AuditFlag, AuditResult, AuditSummary, AuditedRow, BillingRow, Currency, FlagStat, RowError,
};
use audit_report::{history_line, write_reports};

fn audited_row(
    row_id: usize,
    sku: &str,
    currency: Currency,
    quantity: f64,
    net_value: f64,
    flag: AuditFlag,
    customer: &str,
) -> AuditedRow {
    let billed_unit_price = BillingRow::unit_price(quantity, net_value);
    let (current, prior, variance, section) = match flag {
        AuditFlag::Correct2026 => (Some(120.0), Some(110.0), Some(0.0), Some("Platform")),
        AuditFlag::OldPrice2025 => (Some(120.0), Some(110.0), Some(-10.0), Some("Platform")),
        AuditFlag::Credit => (Some(50.0), None, Some(-100.0), Some("Services")),
        _ => (None, None, None, None),
    };
    AuditedRow {
        row: BillingRow {
            row_id,
            sku: sku.to_string(),
            currency,
            quantity,
            net_value,
            billed_unit_price,
            context: vec![("Customer".to_string(), customer.to_string())],
        },
        result: AuditResult {
            flag,
            matched_current_price: current,
            matched_prior_price: prior,
            variance_vs_current: variance,
            rationale: format!("{flag} because of the billed rate"),
        },
        source_section: section.map(ToString::to_string),
    }
}

fn fixture() -> (Vec<AuditedRow>, Vec<RowError>, AuditSummary) {
    let audited = vec![
        audited_row(1, "SKU-A", Currency::Usd, 4.0, 480.0, AuditFlag::Correct2026, "Acme"),
        audited_row(2, "SKU-A", Currency::Usd, 2.0, 220.0, AuditFlag::OldPrice2025, "Acme"),
        audited_row(3, "SKU-B", Currency::Gbp, 1.0, -50.0, AuditFlag::Credit, "Globex"),
        audited_row(4, "SKU-C", Currency::Usd, 1.0, 99.0, AuditFlag::NotInPricebook, "Initech"),
    ];
    let row_errors = vec![RowError {
        row_id: 5,
        message: "unparseable quantity \"lots\"".to_string(),
    }];

    let counted = [
        AuditFlag::Correct2026,
        AuditFlag::OldPrice2025,
        AuditFlag::Credit,
        AuditFlag::NotInPricebook,
    ];
    let nets = [480.0, 220.0, -50.0, 99.0];
    let flags = AuditFlag::ALL
        .iter()
        .map(|&flag| {
            let net = counted
                .iter()
                .position(|&c| c == flag)
                .map_or(0.0, |i| nets[i]);
            let rows = usize::from(counted.contains(&flag));
            FlagStat {
                flag,
                rows,
                percent: if rows == 0 { 0.0 } else { 25.0 },
                net_total: net,
                net_avg: net,
            }
        })
        .collect();

    let summary = AuditSummary {
        generated_at: "2026-02-01T09:30:00Z".to_string(),
        pipeline_version: "0.1.0".to_string(),
        current_year: 2026,
        prior_year: 2025,
        tolerance: 0.005,
        billing_rows: 5,
        row_errors: 1,
        audited_rows: 4,
        review_rows: 2,
        correct_rows: 2,
        total_net_value: 749.0,
        flags,
        pricebook_entries: 12,
        sections: Vec::new(),
    };
    (audited, row_errors, summary)
}

#[test]
fn every_view_is_written_with_the_same_header() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (audited, row_errors, summary) = fixture();

    let set = write_reports(dir.path(), &audited, &row_errors, &summary).expect("write reports");

    let expected_header = "row_id,sku,quantity,net_value,currency,billed_unit_price,Customer,\
                           price_2025,price_2026,variance_vs_2026,source_section,audit_flag,rationale";
    for path in [&set.full, &set.needs_review, &set.correct] {
        let content = fs::read_to_string(path).expect("read view");
        assert_eq!(content.lines().next(), Some(expected_header));
    }
}

#[test]
fn views_partition_the_audited_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (audited, row_errors, summary) = fixture();

    let set = write_reports(dir.path(), &audited, &row_errors, &summary).expect("write reports");

    let full = fs::read_to_string(&set.full).expect("read full");
    let review = fs::read_to_string(&set.needs_review).expect("read review");
    let correct = fs::read_to_string(&set.correct).expect("read correct");

    assert_eq!(full.lines().count(), 5);
    assert_eq!(review.lines().count(), 3);
    assert_eq!(correct.lines().count(), 3);

    assert!(review.contains("OLD_PRICE_2025"));
    assert!(review.contains("NOT_IN_PRICEBOOK"));
    assert!(!review.contains("CORRECT_2026"));
    assert!(correct.contains("CORRECT_2026"));
    assert!(correct.contains("CREDIT"));
    assert!(!correct.contains("OLD_PRICE_2025"));
}

#[test]
fn a_full_row_carries_prices_and_provenance() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (audited, row_errors, summary) = fixture();

    let set = write_reports(dir.path(), &audited, &row_errors, &summary).expect("write reports");

    let full = fs::read_to_string(&set.full).expect("read full");
    let first = full.lines().nth(1).expect("first data row");
    assert_eq!(
        first,
        "1,SKU-A,4,480.00,USD,120.00,Acme,110.00,120.00,0.00,Platform,CORRECT_2026,\
         CORRECT_2026 because of the billed rate"
    );

    // Unmatched rows leave the price cells empty rather than writing 0.00.
    let unmatched = full.lines().nth(4).expect("unmatched row");
    assert!(unmatched.contains("SKU-C"));
    assert!(unmatched.contains(",,,,"));
}

#[test]
fn row_errors_are_reported_only_when_present() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (audited, row_errors, summary) = fixture();

    let set = write_reports(dir.path(), &audited, &row_errors, &summary).expect("write reports");
    let errors_path = set.row_errors.as_ref().expect("row errors path");
    let errors = fs::read_to_string(errors_path).expect("read row errors");
    assert_eq!(errors.lines().count(), 2);
    assert!(errors.contains("unparseable quantity"));
    assert_eq!(set.paths().len(), 6);

    let clean_dir = tempfile::tempdir().expect("temp dir");
    let set = write_reports(clean_dir.path(), &audited, &[], &summary).expect("write reports");
    assert!(set.row_errors.is_none());
    assert!(!clean_dir.path().join("row_errors.csv").exists());
    assert_eq!(set.paths().len(), 5);
}

#[test]
fn summary_csv_lists_every_flag_and_a_total() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (audited, row_errors, summary) = fixture();

    let set = write_reports(dir.path(), &audited, &row_errors, &summary).expect("write reports");

    let content = fs::read_to_string(&set.summary_csv).expect("read summary csv");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1 + AuditFlag::ALL.len() + 1);
    assert_eq!(lines[0], "audit_flag,rows,percent_of_rows,net_total,net_avg");
    assert!(lines.iter().any(|line| line.starts_with("CORRECT_2026,1,25.0,480.00,480.00")));
    assert_eq!(*lines.last().expect("total line"), "TOTAL,4,100.0,749.00,187.25");
}

#[test]
fn summary_json_round_trips() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (audited, row_errors, summary) = fixture();

    let set = write_reports(dir.path(), &audited, &row_errors, &summary).expect("write reports");

    let content = fs::read_to_string(&set.summary_json).expect("read summary json");
    let parsed: AuditSummary = serde_json::from_str(&content).expect("parse summary json");
    assert_eq!(parsed, summary);
    assert!(content.ends_with('\n'));
}

#[test]
fn history_line_is_stable() {
    let (_, _, summary) = fixture();
    let line = history_line(&summary, "2026-02-01 09:30");
    insta::assert_snapshot!(
        line,
        @"2026-02-01 09:30 | v0.1.0 | billing rows: 5 | correct: 2 | needs review: 2 | old price: 1 | no match: 0 | custom: 0 | row errors: 1 | total net: $749.00"
    );
}

#[test]
fn run_history_appends_one_line_per_run() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (_, _, summary) = fixture();
    let path = dir.path().join("run_history.log");

    audit_report::append_run_history(&path, &summary).expect("first append");
    audit_report::append_run_history(&path, &summary).expect("second append");

    let content = fs::read_to_string(&path).expect("read history");
    assert_eq!(content.lines().count(), 2);
    assert!(content.lines().all(|line| line.contains("total net: $749.00")));
}

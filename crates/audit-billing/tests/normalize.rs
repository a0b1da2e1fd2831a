//! Export-level normalization flows.

use audit_billing::normalize_billing;
use audit_ingest::RawTable;
use audit_model::{AuditError, Currency};

fn export(rows: &[&[&str]]) -> RawTable {
    RawTable {
        name: "sap_export".to_string(),
        header_row_index: 0,
        headers: [
            "Sales Org",
            "Material",
            "Order Quant.",
            "Net Value",
            "Curr.",
            "Sold-To Party",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect(),
    }
}

#[test]
fn every_source_row_lands_in_exactly_one_bucket() {
    let table = export(&[
        &["US10", "BASE-100", "4", "1,920.00", "USD", "Initech"],
        &["US10", "TIER-200", "12", "1,080.00", "USD", "Initech"],
        &["US10", "", "1", "99.00", "USD", "Globex"],
        &["GB20", "BASE-100", "", "250.00", "GBP", "Stark"],
        &["US10", "FEE-9", "1", "", "USD", "Globex"],
    ]);
    let outcome = normalize_billing(&table, 5).expect("normalize");

    assert_eq!(outcome.rows.len() + outcome.row_errors.len(), 5);
    assert_eq!(outcome.rows.len(), 3);

    // Row ids are source positions, so errors leave visible holes.
    let ids: Vec<usize> = outcome.rows.iter().map(|row| row.row_id).collect();
    assert_eq!(ids, vec![1, 2, 4]);
    let error_ids: Vec<usize> = outcome.row_errors.iter().map(|err| err.row_id).collect();
    assert_eq!(error_ids, vec![3, 5]);

    // Blank quantity standardized to a flat charge.
    let flat = &outcome.rows[2];
    assert_eq!(flat.quantity, 0.0);
    assert_eq!(flat.currency, Currency::Gbp);
    assert_eq!(flat.billed_unit_price, 250.0);
}

#[test]
fn context_columns_carry_through_in_sheet_order() {
    let table = export(&[&["US10", "BASE-100", "4", "1920.00", "USD", "Initech"]]);
    let outcome = normalize_billing(&table, 0).expect("normalize");
    assert_eq!(
        outcome.rows[0].context,
        vec![
            ("Sales Org".to_string(), "US10".to_string()),
            ("Sold-To Party".to_string(), "Initech".to_string()),
        ]
    );
}

#[test]
fn row_errors_over_the_limit_halt_the_run() {
    let table = export(&[
        &["US10", "BASE-100", "4", "1920.00", "USD", "Initech"],
        &["US10", "FEE-9", "1", "", "USD", "Globex"],
    ]);
    let err = normalize_billing(&table, 0).unwrap_err();
    match err {
        AuditError::RowLimit { errors, limit } => {
            assert_eq!(errors, 1);
            assert_eq!(limit, 0);
        }
        other => panic!("expected RowLimit, got {other:?}"),
    }
}

#[test]
fn an_export_with_no_data_rows_is_an_error() {
    let table = export(&[]);
    let err = normalize_billing(&table, 0).unwrap_err();
    assert!(matches!(err, AuditError::EmptyBilling));
}

use std::fs;
use std::path::PathBuf;

use audit_ingest::{HeaderHints, column_stats, is_numeric_cell, read_raw_table};
use tempfile::TempDir;

fn temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    (dir, path)
}

fn sku_hints() -> HeaderHints {
    HeaderHints::new(&["SKU", "PART NUMBER", "MATERIAL"], 2)
}

#[test]
fn header_on_first_row_is_found_by_keyword() {
    let (_dir, path) = temp_file("plain.csv", "SKU,Price (USD) 2026\nP-100,120.00\n");
    let table = read_raw_table(&path, &sku_hints()).expect("read table");
    assert_eq!(table.header_row_index, 0);
    assert_eq!(table.headers, vec!["SKU", "Price (USD) 2026"]);
    assert_eq!(table.rows, vec![vec!["P-100", "120.00"]]);
}

#[test]
fn banner_rows_above_the_header_are_skipped() {
    let contents = "\
Acme Vendor Pricebook,,
Confidential - internal use only,,
,,
Part Number,Min of Tier,Price (GBP) 2026
P-200,1,80.00
P-200,6,75.00
";
    let (_dir, path) = temp_file("banner.csv", contents);
    let table = read_raw_table(&path, &sku_hints()).expect("read table");
    // Blank spacer rows are dropped before detection, so the physical
    // banner rows collapse to two.
    assert_eq!(table.header_row_index, 2);
    assert_eq!(table.headers[0], "Part Number");
    assert_eq!(table.rows.len(), 2);
}

#[test]
fn statistical_fallback_finds_unhinted_headers() {
    let contents = "Region,Owner,Amount\nEMEA,Jones,1200\nAPAC,Patel,900\n";
    let (_dir, path) = temp_file("fallback.csv", contents);
    let hints = HeaderHints::new(&["NO SUCH KEYWORD"], 2);
    let table = read_raw_table(&path, &hints).expect("read table");
    assert_eq!(table.header_row_index, 0);
    assert_eq!(table.headers, vec!["Region", "Owner", "Amount"]);
}

#[test]
fn missing_header_is_an_error_not_a_guess() {
    let contents = "alpha beta gamma,delta epsilon,zeta eta\nmore prose here,and here,and here\n";
    let (_dir, path) = temp_file("prose.csv", contents);
    let err = read_raw_table(&path, &sku_hints()).unwrap_err();
    assert!(err.to_string().contains("no header row found"));
}

#[test]
fn empty_file_is_an_error() {
    let (_dir, path) = temp_file("empty.csv", "\n\n");
    assert!(read_raw_table(&path, &sku_hints()).is_err());
}

#[test]
fn ragged_rows_are_padded_to_header_width() {
    let contents = "SKU,Qty,Price\nP-1,5\nP-2,3,45.00,extra\n";
    let (_dir, path) = temp_file("ragged.csv", contents);
    let table = read_raw_table(&path, &sku_hints()).expect("read table");
    assert_eq!(table.rows[0], vec!["P-1", "5", ""]);
    // Cells beyond the header width are dropped.
    assert_eq!(table.rows[1], vec!["P-2", "3", "45.00"]);
}

#[test]
fn bom_and_padding_are_stripped_from_headers() {
    let contents = "\u{feff}SKU ,  Billed   Quantity \nP-1,4\n";
    let (_dir, path) = temp_file("bom.csv", contents);
    let table = read_raw_table(&path, &sku_hints()).expect("read table");
    assert_eq!(table.headers, vec!["SKU", "Billed Quantity"]);
}

#[test]
fn column_stats_flag_numeric_columns() {
    let contents = "SKU,Max of Tier,Price (USD) 2026\nP-1,5,\"$1,200.00\"\nP-1,20,$900.00\nP-2,,Custom\n";
    let (_dir, path) = temp_file("stats.csv", contents);
    let table = read_raw_table(&path, &sku_hints()).expect("read table");
    let stats = column_stats(&table);

    assert!(stats[0].numeric_ratio < 0.5);
    assert_eq!(stats[1].numeric_ratio, 1.0);
    assert!((stats[1].filled_ratio - 2.0 / 3.0).abs() < 1e-9);
    // Two of three filled price cells are numeric once symbols are stripped.
    assert!((stats[2].numeric_ratio - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn numeric_cell_check_strips_vendor_formatting() {
    assert!(is_numeric_cell("$1,200.00"));
    assert!(is_numeric_cell("80"));
    assert!(is_numeric_cell("  45.5 "));
    assert!(!is_numeric_cell("Custom"));
    assert!(!is_numeric_cell(""));
    assert!(!is_numeric_cell("R1,234.50"));
}

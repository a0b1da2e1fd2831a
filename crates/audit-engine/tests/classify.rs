//! Classification scenarios over a fixed lookup.

use std::sync::Arc;

use audit_engine::{AuditClassifier, summarize};
use audit_model::{
    AuditConfig, AuditFlag, BillingRow, Currency, PriceEntry, PriceLookup, Pricing, Tier,
};

fn entry(sku: &str, currency: Currency, year: i32, pricing: Pricing) -> PriceEntry {
    PriceEntry {
        sku: sku.to_string(),
        currency,
        year,
        pricing,
        source_section: "Platform".to_string(),
    }
}

fn flat(sku: &str, currency: Currency, year: i32, price: f64) -> PriceEntry {
    entry(sku, currency, year, Pricing::Flat { unit_price: price })
}

fn tiered(sku: &str, currency: Currency, year: i32, rates: [f64; 3]) -> PriceEntry {
    entry(
        sku,
        currency,
        year,
        Pricing::Tiered {
            tiers: vec![
                Tier {
                    min_qty: 0.0,
                    max_qty: Some(6.0),
                    unit_price: rates[0],
                },
                Tier {
                    min_qty: 6.0,
                    max_qty: Some(21.0),
                    unit_price: rates[1],
                },
                Tier {
                    min_qty: 21.0,
                    max_qty: None,
                    unit_price: rates[2],
                },
            ],
        },
    )
}

fn lookup() -> Arc<PriceLookup> {
    let mut lookup = PriceLookup::new();
    for e in [
        flat("BASE-100", Currency::Usd, 2026, 120.0),
        flat("BASE-100", Currency::Usd, 2025, 110.0),
        flat("STABLE-1", Currency::Usd, 2026, 100.0),
        flat("STABLE-1", Currency::Usd, 2025, 100.0),
        tiered("TIER-200", Currency::Usd, 2026, [100.0, 90.0, 80.0]),
        tiered("TIER-200", Currency::Usd, 2025, [95.0, 85.0, 75.0]),
        flat("FEE-9", Currency::Usd, 2026, 250.0),
        entry("SVC-1", Currency::Usd, 2026, Pricing::Custom),
        entry("SVC-1", Currency::Usd, 2025, Pricing::Custom),
        flat("MIX-1", Currency::Gbp, 2026, 80.0),
        entry("CUST-GBP", Currency::Gbp, 2026, Pricing::Custom),
    ] {
        lookup.insert(e).expect("fixture entry");
    }
    Arc::new(lookup)
}

fn classifier() -> AuditClassifier {
    AuditClassifier::new(lookup(), AuditConfig::default())
}

fn row(id: usize, sku: &str, currency: Currency, quantity: f64, net_value: f64) -> BillingRow {
    BillingRow {
        row_id: id,
        sku: sku.to_string(),
        currency,
        quantity,
        net_value,
        billed_unit_price: BillingRow::unit_price(quantity, net_value),
        context: Vec::new(),
    }
}

fn usd(id: usize, sku: &str, quantity: f64, net_value: f64) -> BillingRow {
    row(id, sku, Currency::Usd, quantity, net_value)
}

#[test]
fn billed_at_the_current_rate_is_correct() {
    let audited = classifier().classify(&usd(1, "BASE-100", 4.0, 480.0));
    assert_eq!(audited.result.flag, AuditFlag::Correct2026);
    assert_eq!(audited.result.matched_current_price, Some(120.0));
    assert_eq!(audited.result.matched_prior_price, Some(110.0));
    assert_eq!(audited.result.variance_vs_current, Some(0.0));
    assert!(audited.result.rationale.contains("120.00"));
    assert_eq!(audited.source_section.as_deref(), Some("Platform"));
}

#[test]
fn billed_at_last_years_rate_is_stale() {
    let audited = classifier().classify(&usd(1, "BASE-100", 2.0, 220.0));
    assert_eq!(audited.result.flag, AuditFlag::OldPrice2025);
    assert!(audited.result.rationale.contains("110.00"));
    assert!(audited.result.rationale.contains("120.00"));
}

#[test]
fn matching_an_unchanged_rate_is_not_stale() {
    let audited = classifier().classify(&usd(1, "STABLE-1", 1.0, 100.0));
    assert_eq!(audited.result.flag, AuditFlag::PriceUnchanged);
}

#[test]
fn matching_neither_year_needs_review() {
    // Tier [0, 6) rate is 100.00 in 2026 and 95.00 in 2025; 90.00 is the
    // next band's rate, billed for a quantity that sits in the first.
    let audited = classifier().classify(&usd(1, "TIER-200", 5.0, 450.0));
    assert_eq!(audited.result.flag, AuditFlag::NoMatch);
    assert!(audited.result.rationale.contains("90.00"));
    assert!(audited.result.rationale.contains("100.00"));
    assert!(audited.result.rationale.contains("95.00"));
}

#[test]
fn boundary_quantity_prices_in_the_higher_band() {
    let audited = classifier().classify(&usd(1, "TIER-200", 6.0, 540.0));
    assert_eq!(audited.result.flag, AuditFlag::Correct2026);
    assert_eq!(audited.result.matched_current_price, Some(90.0));
}

#[test]
fn credits_are_accepted_no_matter_the_price() {
    let audited = classifier().classify(&usd(1, "BASE-100", 1.0, -50.0));
    assert_eq!(audited.result.flag, AuditFlag::Credit);
    assert!(audited.result.rationale.contains("-50.00"));
    // Prices still resolved for the report columns.
    assert_eq!(audited.result.matched_current_price, Some(120.0));
}

#[test]
fn an_unknown_sku_with_a_credit_is_still_unknown() {
    let audited = classifier().classify(&usd(1, "GHOST-1", 1.0, -50.0));
    assert_eq!(audited.result.flag, AuditFlag::NotInPricebook);
    assert_eq!(audited.result.matched_current_price, None);
    assert_eq!(audited.source_section, None);
}

#[test]
fn a_custom_sku_with_a_credit_is_contract_priced() {
    let audited = classifier().classify(&usd(1, "SVC-1", 1.0, -50.0));
    assert_eq!(audited.result.flag, AuditFlag::CustomPricing);
    assert!(audited.result.rationale.contains("by contract"));
}

#[test]
fn zero_dollar_zero_quantity_flat_lines_are_expected() {
    let audited = classifier().classify(&usd(1, "FEE-9", 0.0, 0.0));
    assert_eq!(audited.result.flag, AuditFlag::ZeroQtyFlatPrice);
    assert!(!audited.result.flag.needs_review());
}

#[test]
fn zero_dollar_tiered_lines_need_review() {
    let audited = classifier().classify(&usd(1, "TIER-200", 0.0, 0.0));
    assert_eq!(audited.result.flag, AuditFlag::BilledAtZero);
    assert!(audited.result.rationale.contains("100.00"));
}

#[test]
fn zero_dollar_flat_lines_with_quantity_need_review() {
    let audited = classifier().classify(&usd(1, "BASE-100", 4.0, 0.0));
    assert_eq!(audited.result.flag, AuditFlag::BilledAtZero);
}

#[test]
fn a_currency_the_pricebook_lacks_is_a_pricebook_gap() {
    let audited = classifier().classify(&row(1, "MIX-1", Currency::Nzd, 1.0, 80.0));
    assert_eq!(audited.result.flag, AuditFlag::NoPricebookCurrency);
    assert!(audited.result.rationale.contains("GBP"));
    assert!(audited.result.rationale.contains("NZD"));
    // Provenance falls back to the section that does price the SKU.
    assert_eq!(audited.source_section.as_deref(), Some("Platform"));
}

#[test]
fn a_sku_custom_everywhere_beats_the_currency_gap() {
    let audited = classifier().classify(&usd(1, "CUST-GBP", 1.0, 500.0));
    assert_eq!(audited.result.flag, AuditFlag::CustomPricing);
    assert!(audited.result.rationale.contains("contract-priced"));
}

#[test]
fn negative_quantities_sit_in_no_tier() {
    let audited = classifier().classify(&usd(1, "TIER-200", -3.0, 270.0));
    assert_eq!(audited.result.flag, AuditFlag::NoMatch);
    assert!(audited.result.rationale.contains("quantity -3"));
}

#[test]
fn tolerance_absorbs_rounding_but_not_real_drift() {
    let near = classifier().classify(&usd(1, "BASE-100", 1.0, 120.5));
    assert_eq!(near.result.flag, AuditFlag::Correct2026);

    let off = classifier().classify(&usd(1, "BASE-100", 1.0, 121.0));
    assert_eq!(off.result.flag, AuditFlag::NoMatch);
    assert_eq!(off.result.variance_vs_current, Some(1.0));
}

#[test]
fn classification_is_deterministic() {
    let classifier = classifier();
    let line = usd(7, "TIER-200", 12.0, 1_080.0);
    assert_eq!(classifier.classify(&line), classifier.classify(&line));
}

#[test]
fn every_row_is_classified_in_order() {
    let rows = vec![
        usd(1, "BASE-100", 4.0, 480.0),
        usd(2, "GHOST-1", 1.0, 10.0),
        usd(3, "SVC-1", 2.0, 900.0),
        usd(4, "TIER-200", 25.0, 2_000.0),
        usd(5, "BASE-100", 1.0, -120.0),
    ];
    let audited = classifier().classify_all(&rows);

    assert_eq!(audited.len(), rows.len());
    let ids: Vec<usize> = audited.iter().map(|row| row.row.row_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert!(audited.iter().all(|row| !row.result.rationale.is_empty()));
}

#[test]
fn summary_covers_every_flag_and_partitions_rows() {
    let rows = vec![
        usd(1, "BASE-100", 4.0, 480.0),
        usd(2, "BASE-100", 2.0, 220.0),
        usd(3, "GHOST-1", 1.0, 10.0),
        usd(4, "BASE-100", 1.0, -120.0),
    ];
    let config = AuditConfig::default();
    let audited = AuditClassifier::new(lookup(), config.clone()).classify_all(&rows);
    let summary = summarize(&audited, 2, &config, 11, Vec::new());

    assert_eq!(summary.billing_rows, 6);
    assert_eq!(summary.row_errors, 2);
    assert_eq!(summary.audited_rows, 4);
    assert_eq!(summary.review_rows, 2);
    assert_eq!(summary.correct_rows, 2);
    assert_eq!(summary.flags.len(), AuditFlag::ALL.len());
    assert_eq!(summary.flag_rows(AuditFlag::Correct2026), 1);
    assert_eq!(summary.flag_rows(AuditFlag::OldPrice2025), 1);
    assert_eq!(summary.flag_rows(AuditFlag::NotInPricebook), 1);
    assert_eq!(summary.flag_rows(AuditFlag::Credit), 1);
    assert_eq!(summary.flag_rows(AuditFlag::NoMatch), 0);

    let correct = summary
        .flags
        .iter()
        .find(|stat| stat.flag == AuditFlag::Correct2026)
        .expect("stat present");
    assert_eq!(correct.percent, 25.0);
    assert_eq!(correct.net_total, 480.0);
    assert_eq!(correct.net_avg, 480.0);

    let total: f64 = 480.0 + 220.0 + 10.0 - 120.0;
    assert_eq!(summary.total_net_value, total);
    assert_eq!(summary.pricebook_entries, 11);
}

pub mod audit;
pub mod billing;
pub mod config;
pub mod currency;
pub mod entry;
pub mod error;
pub mod flag;
pub mod lookup;
pub mod pricing;
pub mod summary;
pub mod validation;

pub use audit::{AuditResult, AuditedRow};
pub use billing::{BillingRow, RowError};
pub use config::AuditConfig;
pub use currency::{Currency, parse_currency};
pub use entry::{PriceEntry, PriceKey};
pub use error::{AuditError, Result};
pub use flag::AuditFlag;
pub use lookup::PriceLookup;
pub use pricing::{Pricing, PricingModel, Tier};
pub use summary::{AuditSummary, FlagStat, SectionStat};
pub use validation::{Severity, ValidationIssue, ValidationReport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audited_row_round_trips_through_json() {
        let audited = AuditedRow {
            row: BillingRow {
                row_id: 7,
                sku: "SKU-42".to_string(),
                currency: Currency::Usd,
                quantity: 3.0,
                net_value: 360.0,
                billed_unit_price: 120.0,
                context: vec![("Customer".to_string(), "Acme Corp".to_string())],
            },
            result: AuditResult {
                flag: AuditFlag::Correct2026,
                matched_current_price: Some(120.0),
                matched_prior_price: Some(110.0),
                variance_vs_current: Some(0.0),
                rationale: "billed 120.00 matches 2026 rate 120.00".to_string(),
            },
            source_section: Some("Platform".to_string()),
        };
        let json = serde_json::to_string(&audited).expect("serialize audited row");
        let round: AuditedRow = serde_json::from_str(&json).expect("deserialize audited row");
        assert_eq!(round, audited);
        assert!(json.contains("\"CORRECT_2026\""));
    }

    #[test]
    fn price_entry_key_matches_its_fields() {
        let entry = PriceEntry {
            sku: "SKU-1".to_string(),
            currency: Currency::Gbp,
            year: 2025,
            pricing: Pricing::Custom,
            source_section: "Services".to_string(),
        };
        let key = entry.key();
        assert_eq!(key.sku, "SKU-1");
        assert_eq!(key.currency, Currency::Gbp);
        assert_eq!(key.year, 2025);
        assert_eq!(key.to_string(), "SKU-1/GBP/2025");
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Audit outcome for one billing row. Every row gets exactly one flag.
///
/// Declaration order doubles as report display order: the matched family
/// first, then everything a reviewer has to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AuditFlag {
    /// Billed at the current pricebook rate.
    #[serde(rename = "CORRECT_2026")]
    Correct2026,
    /// Current and prior rates are identical and the billed price matches both.
    #[serde(rename = "PRICE_UNCHANGED")]
    PriceUnchanged,
    /// Billed at the prior year's rate instead of the current one.
    #[serde(rename = "OLD_PRICE_2025")]
    OldPrice2025,
    /// Billed price matches neither year's rate.
    #[serde(rename = "NO_MATCH")]
    NoMatch,
    /// Contract-priced SKU; the pricebook carries no list rate to compare.
    #[serde(rename = "CUSTOM_PRICING")]
    CustomPricing,
    /// SKU is in the pricebook but not priced in the billed currency.
    #[serde(rename = "NO_PRICEBOOK_CURRENCY")]
    NoPricebookCurrency,
    /// Zero net value where a nonzero charge was expected.
    #[serde(rename = "BILLED_AT_ZERO")]
    BilledAtZero,
    /// Flat-priced SKU billed with zero quantity and zero value.
    #[serde(rename = "ZERO_QTY_FLAT_PRICE")]
    ZeroQtyFlatPrice,
    /// Negative net value: a credit memo, expected and not reviewed.
    #[serde(rename = "CREDIT")]
    Credit,
    /// SKU absent from the pricebook entirely.
    #[serde(rename = "NOT_IN_PRICEBOOK")]
    NotInPricebook,
}

impl AuditFlag {
    /// Every flag, in report display order.
    pub const ALL: [AuditFlag; 10] = [
        AuditFlag::Correct2026,
        AuditFlag::PriceUnchanged,
        AuditFlag::OldPrice2025,
        AuditFlag::NoMatch,
        AuditFlag::CustomPricing,
        AuditFlag::NoPricebookCurrency,
        AuditFlag::BilledAtZero,
        AuditFlag::ZeroQtyFlatPrice,
        AuditFlag::Credit,
        AuditFlag::NotInPricebook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditFlag::Correct2026 => "CORRECT_2026",
            AuditFlag::PriceUnchanged => "PRICE_UNCHANGED",
            AuditFlag::OldPrice2025 => "OLD_PRICE_2025",
            AuditFlag::NoMatch => "NO_MATCH",
            AuditFlag::CustomPricing => "CUSTOM_PRICING",
            AuditFlag::NoPricebookCurrency => "NO_PRICEBOOK_CURRENCY",
            AuditFlag::BilledAtZero => "BILLED_AT_ZERO",
            AuditFlag::ZeroQtyFlatPrice => "ZERO_QTY_FLAT_PRICE",
            AuditFlag::Credit => "CREDIT",
            AuditFlag::NotInPricebook => "NOT_IN_PRICEBOOK",
        }
    }

    /// True for flags a human should look at; false for the accepted
    /// outcomes (correct, unchanged, zero-quantity flat lines, credits).
    pub fn needs_review(&self) -> bool {
        match self {
            AuditFlag::OldPrice2025
            | AuditFlag::NoMatch
            | AuditFlag::CustomPricing
            | AuditFlag::NoPricebookCurrency
            | AuditFlag::BilledAtZero
            | AuditFlag::NotInPricebook => true,
            AuditFlag::Correct2026
            | AuditFlag::PriceUnchanged
            | AuditFlag::ZeroQtyFlatPrice
            | AuditFlag::Credit => false,
        }
    }

    /// One-line meaning, for the `flags` subcommand and report legend.
    pub fn description(&self) -> &'static str {
        match self {
            AuditFlag::Correct2026 => "Billed at the current pricebook rate",
            AuditFlag::PriceUnchanged => {
                "Current and prior rates are identical; billed price matches both"
            }
            AuditFlag::OldPrice2025 => "Billed at the prior year's rate instead of the current one",
            AuditFlag::NoMatch => "Billed price matches neither year's rate",
            AuditFlag::CustomPricing => "Contract-priced SKU with no list rate to compare against",
            AuditFlag::NoPricebookCurrency => {
                "SKU is in the pricebook but not priced in the billed currency"
            }
            AuditFlag::BilledAtZero => "Zero net value where a nonzero charge was expected",
            AuditFlag::ZeroQtyFlatPrice => "Flat-priced SKU with zero quantity and zero value",
            AuditFlag::Credit => "Negative net value (credit memo)",
            AuditFlag::NotInPricebook => "SKU absent from the pricebook entirely",
        }
    }
}

impl fmt::Display for AuditFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditFlag::ALL
            .iter()
            .find(|flag| flag.as_str() == s.trim().to_uppercase())
            .copied()
            .ok_or_else(|| format!("Unknown audit flag: {}", s))
    }
}

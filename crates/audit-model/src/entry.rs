use serde::{Deserialize, Serialize};
use std::fmt;

use crate::currency::Currency;
use crate::pricing::Pricing;

/// Lookup key for the normalized pricebook. One price per SKU, currency,
/// and pricebook year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PriceKey {
    pub sku: String,
    pub currency: Currency,
    pub year: i32,
}

impl fmt::Display for PriceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.sku, self.currency, self.year)
    }
}

/// One canonical pricebook entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub sku: String,
    pub currency: Currency,
    pub year: i32,
    pub pricing: Pricing,
    /// Pricebook section (product family) the entry came from. Carried
    /// through to reports so a flagged row can be traced back to its sheet.
    pub source_section: String,
}

impl PriceEntry {
    pub fn key(&self) -> PriceKey {
        PriceKey {
            sku: self.sku.clone(),
            currency: self.currency,
            year: self.year,
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::currency::Currency;

/// One standardized billing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRow {
    /// 1-based data-row position in the source export. Stable across the
    /// run, so every report and log line can point back at the file.
    pub row_id: usize,
    pub sku: String,
    pub currency: Currency,
    pub quantity: f64,
    pub net_value: f64,
    /// `net_value / quantity`, or `net_value` itself for zero-quantity
    /// lines (flat charges are exported with quantity 0).
    pub billed_unit_price: f64,
    /// Descriptive columns (customer, document numbers, dates) carried
    /// through to reports untouched, in first-seen column order.
    pub context: Vec<(String, String)>,
}

impl BillingRow {
    /// Effective per-unit price of the line.
    pub fn unit_price(quantity: f64, net_value: f64) -> f64 {
        if quantity == 0.0 {
            net_value
        } else {
            net_value / quantity
        }
    }
}

/// A billing line the normalizer could not standardize. Collected, never
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub row_id: usize,
    pub message: String,
}

use serde::{Deserialize, Serialize};

use crate::billing::BillingRow;
use crate::flag::AuditFlag;

/// Classification outcome for one billing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub flag: AuditFlag,
    /// Resolved current-year unit rate, when one exists for the row's key.
    pub matched_current_price: Option<f64>,
    /// Resolved prior-year unit rate, when one exists.
    pub matched_prior_price: Option<f64>,
    /// `billed_unit_price - matched_current_price`, when the current rate
    /// resolves. Reviewers sort by this.
    pub variance_vs_current: Option<f64>,
    /// Why the flag was chosen. Populated for every row, matches included.
    pub rationale: String,
}

/// A billing row with its audit outcome attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditedRow {
    pub row: BillingRow,
    pub result: AuditResult,
    /// Section of the pricebook the matched entry came from, when any
    /// entry matched.
    pub source_section: Option<String>,
}

//! Classifier entry point: joins billing rows against the shared lookup.

use std::sync::Arc;

use audit_model::{AuditConfig, AuditedRow, BillingRow, PriceLookup};
use tracing::{debug, info};

use crate::policy::{ClassificationPolicy, RowContext};
use crate::resolve::resolve_price;

/// Joins rows to pricebook entries and applies the classification policy.
///
/// The lookup is shared immutable state: built once by the pricebook
/// normalizer, never written after construction, so classifying rows needs
/// no synchronization.
pub struct AuditClassifier {
    lookup: Arc<PriceLookup>,
    config: AuditConfig,
    policy: ClassificationPolicy,
}

impl AuditClassifier {
    pub fn new(lookup: Arc<PriceLookup>, config: AuditConfig) -> Self {
        Self {
            lookup,
            config,
            policy: ClassificationPolicy::standard(),
        }
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.policy.rule_names()
    }

    fn context<'a>(&'a self, row: &'a BillingRow) -> RowContext<'a> {
        let current = self
            .lookup
            .get(&row.sku, row.currency, self.config.current_year);
        let prior = self
            .lookup
            .get(&row.sku, row.currency, self.config.prior_year);
        let sku_known = self.lookup.sku_known(&row.sku);
        let all_entries_custom = sku_known
            && self
                .lookup
                .entries_for_sku(&row.sku)
                .all(|entry| entry.pricing.is_custom());
        RowContext {
            row,
            config: &self.config,
            current,
            prior,
            sku_known,
            known_currencies: self.lookup.currencies_for_sku(&row.sku),
            all_entries_custom,
            expected_current: resolve_price(current, row.quantity),
            expected_prior: resolve_price(prior, row.quantity),
        }
    }

    /// Classify one row. Pure: same row and lookup, same outcome.
    pub fn classify(&self, row: &BillingRow) -> AuditedRow {
        let ctx = self.context(row);
        let result = self.policy.decide(&ctx);
        // Provenance: the matched entry's section, falling back to any
        // section that prices the SKU (currency gaps, custom SKUs).
        let source_section = ctx
            .current
            .or(ctx.prior)
            .map(|entry| entry.source_section.clone())
            .or_else(|| {
                self.lookup
                    .entries_for_sku(&row.sku)
                    .next()
                    .map(|entry| entry.source_section.clone())
            });
        debug!(row = row.row_id, flag = %result.flag, "classified");
        AuditedRow {
            row: row.clone(),
            result,
            source_section,
        }
    }

    /// Classify a batch, order preserved, one result per input row.
    pub fn classify_all(&self, rows: &[BillingRow]) -> Vec<AuditedRow> {
        let audited: Vec<AuditedRow> = rows.iter().map(|row| self.classify(row)).collect();
        info!(rows = audited.len(), "classified billing rows");
        audited
    }
}

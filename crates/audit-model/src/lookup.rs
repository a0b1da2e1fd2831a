use std::collections::{BTreeMap, BTreeSet};

use crate::currency::Currency;
use crate::entry::PriceEntry;
use crate::error::AuditError;

/// Normalized pricebook index keyed by `(sku, currency, year)`.
///
/// Built once by the pricebook normalizer, then shared read-only with the
/// classifier. Iteration order is deterministic (SKU, then currency, then
/// year).
#[derive(Debug, Clone, Default)]
pub struct PriceLookup {
    entries: BTreeMap<String, BTreeMap<(Currency, i32), PriceEntry>>,
    len: usize,
}

impl PriceLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one entry. The same key showing up again with identical
    /// pricing merges silently (sections overlap at family boundaries);
    /// the same key with different pricing is a pricebook defect.
    pub fn insert(&mut self, entry: PriceEntry) -> Result<(), AuditError> {
        let slot = self
            .entries
            .entry(entry.sku.clone())
            .or_default()
            .entry((entry.currency, entry.year));
        match slot {
            std::collections::btree_map::Entry::Occupied(existing) => {
                if existing.get().pricing == entry.pricing {
                    Ok(())
                } else {
                    Err(AuditError::DuplicateKey {
                        sku: entry.sku,
                        currency: entry.currency,
                        year: entry.year,
                    })
                }
            }
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                self.len += 1;
                Ok(())
            }
        }
    }

    pub fn get(&self, sku: &str, currency: Currency, year: i32) -> Option<&PriceEntry> {
        self.entries.get(sku)?.get(&(currency, year))
    }

    /// True when the SKU appears in any currency or year.
    pub fn sku_known(&self, sku: &str) -> bool {
        self.entries.contains_key(sku)
    }

    /// Currencies the SKU is priced in, for rationale text.
    pub fn currencies_for_sku(&self, sku: &str) -> BTreeSet<Currency> {
        self.entries
            .get(sku)
            .map(|by_key| by_key.keys().map(|(currency, _)| *currency).collect())
            .unwrap_or_default()
    }

    pub fn entries_for_sku(&self, sku: &str) -> impl Iterator<Item = &PriceEntry> {
        self.entries.get(sku).into_iter().flat_map(BTreeMap::values)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceEntry> {
        self.entries.values().flat_map(BTreeMap::values)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::Pricing;

    fn flat_entry(sku: &str, currency: Currency, year: i32, price: f64) -> PriceEntry {
        PriceEntry {
            sku: sku.to_string(),
            currency,
            year,
            pricing: Pricing::Flat { unit_price: price },
            source_section: "Platform".to_string(),
        }
    }

    #[test]
    fn identical_duplicate_merges_idempotently() {
        let mut lookup = PriceLookup::new();
        lookup
            .insert(flat_entry("SKU-1", Currency::Usd, 2026, 100.0))
            .unwrap();
        lookup
            .insert(flat_entry("SKU-1", Currency::Usd, 2026, 100.0))
            .unwrap();
        assert_eq!(lookup.len(), 1);
    }

    #[test]
    fn conflicting_duplicate_is_an_error() {
        let mut lookup = PriceLookup::new();
        lookup
            .insert(flat_entry("SKU-1", Currency::Usd, 2026, 100.0))
            .unwrap();
        let err = lookup
            .insert(flat_entry("SKU-1", Currency::Usd, 2026, 105.0))
            .unwrap_err();
        assert!(matches!(err, AuditError::DuplicateKey { .. }));
        assert_eq!(lookup.len(), 1);
    }

    #[test]
    fn lookup_is_keyed_by_sku_currency_and_year() {
        let mut lookup = PriceLookup::new();
        lookup
            .insert(flat_entry("SKU-1", Currency::Usd, 2026, 100.0))
            .unwrap();
        lookup
            .insert(flat_entry("SKU-1", Currency::Gbp, 2026, 80.0))
            .unwrap();
        lookup
            .insert(flat_entry("SKU-1", Currency::Usd, 2025, 95.0))
            .unwrap();

        assert_eq!(lookup.len(), 3);
        assert!(lookup.get("SKU-1", Currency::Usd, 2026).is_some());
        assert!(lookup.get("SKU-1", Currency::Eur, 2026).is_none());
        assert!(lookup.sku_known("SKU-1"));
        assert!(!lookup.sku_known("SKU-2"));

        let currencies = lookup.currencies_for_sku("SKU-1");
        assert_eq!(
            currencies.into_iter().collect::<Vec<_>>(),
            vec![Currency::Usd, Currency::Gbp]
        );
    }
}

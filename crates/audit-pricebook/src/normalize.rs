//! Assembly of all sections into the canonical price lookup.

use audit_ingest::RawTable;
use audit_model::{AuditError, PriceLookup, PricingModel, SectionStat};
use tracing::{debug, info, warn};

use crate::section::process_section;

/// The pricebook after normalization: the lookup the classifier reads,
/// plus per-section stats for the run summary.
#[derive(Debug)]
pub struct NormalizedPricebook {
    pub lookup: PriceLookup,
    pub sections: Vec<SectionStat>,
}

/// Normalize every raw section and merge the results.
///
/// Identical entries appearing in more than one section merge silently;
/// the same key with different pricing is a defect and fails the run.
pub fn normalize_pricebook(
    tables: &[RawTable],
    current_year: i32,
    prior_year: i32,
) -> Result<NormalizedPricebook, AuditError> {
    let mut lookup = PriceLookup::new();
    let mut sections = Vec::with_capacity(tables.len());

    for table in tables {
        let outcome = process_section(table, current_year, prior_year)?;
        if outcome.stat.skip_reason.is_none() && outcome.entries.is_empty() {
            // A price table that yields nothing usually means the vendor
            // moved the layout out from under the detector.
            warn!(
                section = %table.name,
                "section looked like a price table but produced no entries"
            );
        }
        for entry in outcome.entries {
            lookup.insert(entry)?;
        }
        sections.push(outcome.stat);
    }

    if lookup.is_empty() {
        return Err(AuditError::EmptyPricebook);
    }

    let count = |model: PricingModel| {
        lookup
            .iter()
            .filter(|entry| entry.pricing.model() == model)
            .count()
    };
    debug!(
        flat = count(PricingModel::Flat),
        tiered = count(PricingModel::Tiered),
        seat_based = count(PricingModel::SeatBased),
        custom = count(PricingModel::Custom),
        "pricing model breakdown"
    );
    info!(
        entries = lookup.len(),
        sections = sections.len(),
        "normalized pricebook"
    );

    Ok(NormalizedPricebook { lookup, sections })
}

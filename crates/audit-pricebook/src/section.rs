//! Per-section row assembly: raw cells to canonical price entries.

use std::collections::BTreeMap;

use audit_ingest::RawTable;
use audit_model::{AuditError, Currency, PriceEntry, Pricing, SectionStat};
use tracing::{debug, warn};

use crate::columns::{SectionColumns, discover_columns};
use crate::numeric::{clean_price, is_custom_cell, parse_band};
use crate::tiers::{BandRow, build_tiers};

/// Everything one section contributes: entries plus its stat line for the
/// run summary.
#[derive(Debug)]
pub struct SectionOutcome {
    pub entries: Vec<PriceEntry>,
    pub stat: SectionStat,
}

/// What accumulates for one `(sku, currency, year)` while walking rows.
#[derive(Debug, Default)]
struct KeyAccum {
    custom: bool,
    bands: Vec<BandRow>,
}

fn skipped(table: &RawTable, reason: &str) -> SectionOutcome {
    warn!(section = %table.name, reason, "skipping pricebook section");
    SectionOutcome {
        entries: Vec::new(),
        stat: SectionStat {
            name: table.name.clone(),
            entries: 0,
            skipped_rows: table.rows.len(),
            skip_reason: Some(reason.to_string()),
        },
    }
}

/// Normalize one raw section.
///
/// Sections that are not price tables (no SKU column, no price columns)
/// are skipped with a recorded reason. Defects inside a recognized price
/// table, such as contested currencies or band gaps, fail the run.
pub fn process_section(
    table: &RawTable,
    current_year: i32,
    prior_year: i32,
) -> Result<SectionOutcome, AuditError> {
    let Some(columns) = discover_columns(table, current_year, prior_year)? else {
        return Ok(skipped(table, "no SKU column"));
    };
    if columns.prices.is_empty() {
        return Ok(skipped(table, "no price columns"));
    }
    if table.rows.is_empty() {
        return Ok(skipped(table, "no data rows"));
    }

    let mut accums: BTreeMap<(String, Currency, i32), KeyAccum> = BTreeMap::new();
    let mut skipped_rows = 0usize;
    // Merged SKU cells arrive blank on continuation rows; carry the last
    // seen SKU forward within the section.
    let mut last_sku: Option<String> = None;

    for (row_idx, row) in table.rows.iter().enumerate() {
        let raw_sku = row.get(columns.sku).map_or("", String::as_str).trim();
        let sku = if raw_sku.is_empty() {
            match &last_sku {
                Some(sku) => sku.clone(),
                None => {
                    skipped_rows += 1;
                    debug!(
                        section = %table.name,
                        row = row_idx,
                        "row has no SKU and nothing to inherit"
                    );
                    continue;
                }
            }
        } else {
            let sku = raw_sku.to_uppercase();
            last_sku = Some(sku.clone());
            sku
        };

        let min = columns
            .min_band
            .and_then(|idx| parse_band(row.get(idx).map_or("", String::as_str)));
        let max = columns
            .max_band
            .and_then(|idx| parse_band(row.get(idx).map_or("", String::as_str)));

        let mut contributed = false;
        for price_col in &columns.prices {
            let cell = row.get(price_col.index).map_or("", String::as_str);
            let accum_key = (sku.clone(), price_col.currency, price_col.year);
            if is_custom_cell(cell) {
                accums.entry(accum_key).or_default().custom = true;
                contributed = true;
            } else if let Some(unit_price) = clean_price(cell) {
                accums
                    .entry(accum_key)
                    .or_default()
                    .bands
                    .push(BandRow {
                        min,
                        max,
                        unit_price,
                    });
                contributed = true;
            }
        }
        if !contributed {
            skipped_rows += 1;
            debug!(
                section = %table.name,
                row = row_idx,
                sku = %sku,
                "row has no usable prices"
            );
        }
    }

    let mut entries = Vec::new();
    for ((sku, currency, year), accum) in accums {
        let pricing = build_pricing(&sku, currency, year, accum, &columns)?;
        let Some(pricing) = pricing else { continue };
        entries.push(PriceEntry {
            sku,
            currency,
            year,
            pricing,
            source_section: table.name.clone(),
        });
    }

    debug!(
        section = %table.name,
        entries = entries.len(),
        skipped_rows,
        "normalized pricebook section"
    );

    Ok(SectionOutcome {
        stat: SectionStat {
            name: table.name.clone(),
            entries: entries.len(),
            skipped_rows,
            skip_reason: None,
        },
        entries,
    })
}

/// Decide the pricing model for one key from what its rows accumulated.
///
/// Any custom marker wins. One distinct priced band is a flat rate; two or
/// more go through tier construction. Multiple distinct prices without band
/// columns are conflicting flat rates, which is the duplicate-key defect.
fn build_pricing(
    sku: &str,
    currency: Currency,
    year: i32,
    accum: KeyAccum,
    columns: &SectionColumns,
) -> Result<Option<Pricing>, AuditError> {
    if accum.custom {
        return Ok(Some(Pricing::Custom));
    }

    let mut bands: Vec<BandRow> = Vec::with_capacity(accum.bands.len());
    for band in accum.bands {
        if !bands.contains(&band) {
            bands.push(band);
        }
    }

    match bands.len() {
        0 => Ok(None),
        1 => Ok(Some(Pricing::Flat {
            unit_price: bands[0].unit_price,
        })),
        _ if !columns.has_bands() => Err(AuditError::DuplicateKey {
            sku: sku.to_string(),
            currency,
            year,
        }),
        _ => {
            let tiers = build_tiers(sku, currency, year, bands)?;
            if columns.seat_vocabulary {
                Ok(Some(Pricing::SeatBased { tiers }))
            } else {
                Ok(Some(Pricing::Tiered { tiers }))
            }
        }
    }
}

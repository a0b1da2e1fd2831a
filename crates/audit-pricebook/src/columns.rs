//! Column discovery for one pricebook section.

use audit_ingest::{ColumnStats, HeaderHints, RawTable, column_stats};
use audit_model::{AuditError, Currency};
use tracing::debug;

use crate::patterns::{BAND_CONTEXT_TOKENS, PRICE_TOKENS, SEAT_TOKENS, SKU_TOKENS, contains_any};
use crate::score::{detect_currency, detect_year};

/// Band columns must be mostly numeric where filled; anything below this is
/// a mis-detected text column.
const BAND_NUMERIC_FLOOR: f64 = 0.5;

/// One detected price column: which currency and pricebook year it quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceColumn {
    pub index: usize,
    pub currency: Currency,
    pub year: i32,
}

/// The columns a section contributes to normalization.
#[derive(Debug, Clone)]
pub struct SectionColumns {
    pub sku: usize,
    pub min_band: Option<usize>,
    pub max_band: Option<usize>,
    pub prices: Vec<PriceColumn>,
    /// Band headers use seat/user vocabulary, so multi-band entries are
    /// seat-based rather than volume-tiered.
    pub seat_vocabulary: bool,
}

impl SectionColumns {
    pub fn has_bands(&self) -> bool {
        self.min_band.is_some() || self.max_band.is_some()
    }
}

/// Header hints for reading pricebook section files: the header row is the
/// one naming the SKU column.
pub fn header_hints() -> HeaderHints {
    HeaderHints::new(SKU_TOKENS, 2)
}

fn is_band_header(upper: &str, bound_tokens: &[&str]) -> bool {
    contains_any(upper, bound_tokens) && contains_any(upper, BAND_CONTEXT_TOKENS)
}

fn band_is_numeric(stats: &[ColumnStats], index: usize) -> bool {
    stats
        .get(index)
        .is_none_or(|stat| stat.filled_ratio == 0.0 || stat.numeric_ratio >= BAND_NUMERIC_FLOOR)
}

/// Classify a section's headers.
///
/// `Ok(None)` means the section has no SKU column and should be skipped
/// (notes and legend sheets). A price-intent header whose currency cannot
/// be detected, or is contested, fails the run.
pub fn discover_columns(
    table: &RawTable,
    current_year: i32,
    prior_year: i32,
) -> Result<Option<SectionColumns>, AuditError> {
    let stats = column_stats(table);

    let mut sku = None;
    let mut min_band = None;
    let mut max_band = None;
    let mut prices = Vec::new();
    let mut seat_vocabulary = false;

    for (index, header) in table.headers.iter().enumerate() {
        let upper = header.to_uppercase();
        if upper.is_empty() {
            continue;
        }

        if sku.is_none() && contains_any(&upper, SKU_TOKENS) {
            sku = Some(index);
            continue;
        }

        if is_band_header(&upper, &["MIN", "FROM"]) && band_is_numeric(&stats, index) {
            if min_band.is_none() {
                min_band = Some(index);
            }
            seat_vocabulary |= contains_any(&upper, SEAT_TOKENS);
            continue;
        }
        if is_band_header(&upper, &["MAX", "UP TO"]) && band_is_numeric(&stats, index) {
            if max_band.is_none() {
                max_band = Some(index);
            }
            seat_vocabulary |= contains_any(&upper, SEAT_TOKENS);
            continue;
        }

        match detect_currency(header)? {
            Some(detected) => {
                let year = detect_year(header, current_year, prior_year).unwrap_or_else(|| {
                    debug!(
                        section = %table.name,
                        header = %header,
                        "price column has no year marker, assuming current year"
                    );
                    current_year
                });
                prices.push(PriceColumn {
                    index,
                    currency: detected.currency,
                    year,
                });
            }
            None => {
                // A column that talks about prices but names no currency
                // cannot be audited against; refuse rather than guess.
                if contains_any(&upper, PRICE_TOKENS) && !upper.contains('%') {
                    return Err(AuditError::UnrecognizedCurrency {
                        token: header.clone(),
                    });
                }
            }
        }
    }

    let Some(sku) = sku else {
        return Ok(None);
    };

    Ok(Some(SectionColumns {
        sku,
        min_band,
        max_band,
        prices,
        seat_vocabulary,
    }))
}

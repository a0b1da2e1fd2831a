//! Canonicalization of vendor quantity bands into contiguous tiers.

use audit_model::{AuditError, Currency, Tier};

/// One priced band row as it appears in a section, before canonicalization.
/// Vendors publish inclusive integer ranges (`1-5`, `6-20`), sometimes with
/// only the upper bound filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct BandRow {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit_price: f64,
}

impl BandRow {
    fn sort_key(&self) -> f64 {
        // Ordering by min and by max agree for sane bands; either works
        // for the convention the section actually uses.
        self.min.or(self.max).unwrap_or(f64::MAX)
    }

    fn describe(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("[{min}, {max}]"),
            (Some(min), None) => format!("[{min}, ..]"),
            (None, Some(max)) => format!("[.., {max}]"),
            (None, None) => "(no bounds)".to_string(),
        }
    }
}

/// Exclusive upper boundary between two adjacent source bands.
///
/// Accepts both conventions vendors use: inclusive integer ranges where the
/// next band starts at `prev.max + 1`, and already-half-open ranges where it
/// starts at `prev.max`. Anything further apart is a gap; any inversion is
/// an overlap.
fn boundary_between(
    prev: &BandRow,
    next: &BandRow,
    err: &impl Fn(bool, String) -> AuditError,
) -> Result<f64, AuditError> {
    match (prev.max, next.min) {
        (Some(prev_max), Some(next_min)) => {
            if next_min < prev_max {
                Err(err(
                    false,
                    format!(
                        "band {} runs past the start of band {}",
                        prev.describe(),
                        next.describe()
                    ),
                ))
            } else if next_min > prev_max + 1.0 {
                Err(err(
                    true,
                    format!(
                        "band {} is followed by band {}",
                        prev.describe(),
                        next.describe()
                    ),
                ))
            } else {
                Ok(next_min)
            }
        }
        // Only the upper bound is published: inclusive integer convention,
        // so the next band starts one past it.
        (Some(prev_max), None) => {
            if prev_max.fract() == 0.0 {
                Ok(prev_max + 1.0)
            } else {
                Ok(prev_max)
            }
        }
        (None, Some(next_min)) => Ok(next_min),
        (None, None) => Err(err(
            true,
            format!(
                "no boundary between band {} and band {}",
                prev.describe(),
                next.describe()
            ),
        )),
    }
}

/// Turn priced band rows into tiers forming a contiguous, non-overlapping
/// cover of `[0, inf)`.
///
/// The first tier's floor is forced to 0 and the last tier is unbounded:
/// a quantity above the top published band prices at the top band's rate.
/// Exact duplicate rows merge; everything else inconsistent is a pricebook
/// defect reported against the key.
pub fn build_tiers(
    sku: &str,
    currency: Currency,
    year: i32,
    mut bands: Vec<BandRow>,
) -> Result<Vec<Tier>, AuditError> {
    let gap_or_overlap = |is_gap: bool, detail: String| {
        if is_gap {
            AuditError::TierGap {
                sku: sku.to_string(),
                currency,
                year,
                detail,
            }
        } else {
            AuditError::TierOverlap {
                sku: sku.to_string(),
                currency,
                year,
                detail,
            }
        }
    };

    // Exact duplicates (the same band exported under two families) merge.
    let mut deduped: Vec<BandRow> = Vec::with_capacity(bands.len());
    for band in bands.drain(..) {
        if !deduped.contains(&band) {
            deduped.push(band);
        }
    }
    let mut bands = deduped;

    if let Some(unbounded) = bands.iter().find(|b| b.min.is_none() && b.max.is_none()) {
        return Err(gap_or_overlap(
            true,
            format!(
                "a band row priced at {} has no bounds",
                unbounded.unit_price
            ),
        ));
    }

    bands.sort_by(|a, b| {
        a.sort_key()
            .partial_cmp(&b.sort_key())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for pair in bands.windows(2) {
        if pair[0].sort_key() == pair[1].sort_key() {
            return Err(gap_or_overlap(
                false,
                format!(
                    "bands {} and {} claim the same quantities at different prices",
                    pair[0].describe(),
                    pair[1].describe()
                ),
            ));
        }
    }

    let mut tiers = Vec::with_capacity(bands.len());
    let mut floor = 0.0_f64;
    for idx in 0..bands.len() {
        let upper = if idx + 1 == bands.len() {
            None
        } else {
            Some(boundary_between(&bands[idx], &bands[idx + 1], &gap_or_overlap)?)
        };
        if let Some(upper) = upper
            && upper <= floor
        {
            return Err(gap_or_overlap(
                false,
                format!("band {} collapses to nothing", bands[idx].describe()),
            ));
        }
        tiers.push(Tier {
            min_qty: floor,
            max_qty: upper,
            unit_price: bands[idx].unit_price,
        });
        if let Some(upper) = upper {
            floor = upper;
        }
    }

    Ok(tiers)
}

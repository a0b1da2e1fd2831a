//! Price resolution and tolerant comparison.

use audit_model::{PriceEntry, Pricing};

/// Contracted unit rate for `quantity` under `entry`'s pricing.
///
/// Flat prices ignore quantity. Tiered and seat-based pricing return the
/// rate of the tier containing `quantity`; a negative quantity sits in no
/// tier and resolves to nothing. Custom pricing carries no numeric rate.
pub fn resolve_price(entry: Option<&PriceEntry>, quantity: f64) -> Option<f64> {
    match &entry?.pricing {
        Pricing::Flat { unit_price } => Some(*unit_price),
        Pricing::Tiered { tiers } | Pricing::SeatBased { tiers } => tiers
            .iter()
            .find(|tier| tier.contains(quantity))
            .map(|tier| tier.unit_price),
        Pricing::Custom => None,
    }
}

/// Relative comparison: `a` and `b` agree when their difference is within
/// `tolerance` of the larger magnitude. Exact equality short-circuits so
/// zero matches zero at any tolerance.
pub fn relative_eq(a: f64, b: f64, tolerance: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= tolerance * a.abs().max(b.abs())
}

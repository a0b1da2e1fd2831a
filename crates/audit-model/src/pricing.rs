use serde::{Deserialize, Serialize};
use std::fmt;

/// How a `(sku, currency, year)` combination is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingModel {
    /// One unit price regardless of quantity.
    Flat,
    /// Unit price depends on which quantity band the order lands in.
    Tiered,
    /// Tiered by seat/user count rather than order volume.
    SeatBased,
    /// Contract-priced; the pricebook carries no numeric rate.
    Custom,
}

impl PricingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingModel::Flat => "FLAT",
            PricingModel::Tiered => "TIERED",
            PricingModel::SeatBased => "SEAT_BASED",
            PricingModel::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for PricingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One quantity band of a tiered price.
///
/// Bands are half-open: a quantity belongs to the tier when
/// `min_qty <= qty < max_qty`. `max_qty: None` marks the unbounded top band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub min_qty: f64,
    pub max_qty: Option<f64>,
    pub unit_price: f64,
}

impl Tier {
    pub fn contains(&self, qty: f64) -> bool {
        qty >= self.min_qty && self.max_qty.is_none_or(|max| qty < max)
    }
}

/// Price basis for one pricebook entry, carrying only what its model needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Pricing {
    Flat { unit_price: f64 },
    Tiered { tiers: Vec<Tier> },
    SeatBased { tiers: Vec<Tier> },
    Custom,
}

impl Pricing {
    pub fn model(&self) -> PricingModel {
        match self {
            Pricing::Flat { .. } => PricingModel::Flat,
            Pricing::Tiered { .. } => PricingModel::Tiered,
            Pricing::SeatBased { .. } => PricingModel::SeatBased,
            Pricing::Custom => PricingModel::Custom,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Pricing::Custom)
    }

    /// Quantity bands, for the two tiered models.
    pub fn tiers(&self) -> Option<&[Tier]> {
        match self {
            Pricing::Tiered { tiers } | Pricing::SeatBased { tiers } => Some(tiers),
            Pricing::Flat { .. } | Pricing::Custom => None,
        }
    }

    pub fn flat_price(&self) -> Option<f64> {
        match self {
            Pricing::Flat { unit_price } => Some(*unit_price),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_bounds_are_min_inclusive_max_exclusive() {
        let tier = Tier {
            min_qty: 6.0,
            max_qty: Some(21.0),
            unit_price: 90.0,
        };
        assert!(!tier.contains(5.9));
        assert!(tier.contains(6.0));
        assert!(tier.contains(20.99));
        assert!(!tier.contains(21.0));
    }

    #[test]
    fn unbounded_tier_contains_everything_above_min() {
        let tier = Tier {
            min_qty: 51.0,
            max_qty: None,
            unit_price: 70.0,
        };
        assert!(tier.contains(51.0));
        assert!(tier.contains(1_000_000.0));
        assert!(!tier.contains(50.0));
    }

    #[test]
    fn pricing_serializes_with_model_tag() {
        let flat = Pricing::Flat { unit_price: 120.0 };
        let json = serde_json::to_string(&flat).unwrap();
        assert_eq!(json, "{\"model\":\"FLAT\",\"unit_price\":120.0}");

        let custom: Pricing = serde_json::from_str("{\"model\":\"CUSTOM\"}").unwrap();
        assert!(custom.is_custom());
    }

    #[test]
    fn model_names_match_reporting_vocabulary() {
        assert_eq!(PricingModel::SeatBased.as_str(), "SEAT_BASED");
        assert_eq!(
            Pricing::Tiered { tiers: vec![] }.model(),
            PricingModel::Tiered
        );
    }
}

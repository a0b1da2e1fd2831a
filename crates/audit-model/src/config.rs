use serde::{Deserialize, Serialize};

use crate::error::AuditError;

/// Knobs for one audit run. Defaults reconcile the 2026 pricebook against
/// 2025; every field can come from `audit.toml` or the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Pricebook year billed prices are expected to match.
    pub current_year: i32,
    /// Previous pricebook year, for stale-price detection.
    pub prior_year: i32,
    /// Relative tolerance for price comparison. 0.005 means a billed price
    /// within 0.5% of the expected rate counts as a match.
    pub tolerance: f64,
    /// Malformed billing rows tolerated before the run halts. 0 means any
    /// row error stops the audit before a report is written.
    pub max_row_errors: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            current_year: 2026,
            prior_year: 2025,
            tolerance: 0.005,
            max_row_errors: 0,
        }
    }
}

impl AuditConfig {
    pub fn validate(&self) -> Result<(), AuditError> {
        if !(self.tolerance >= 0.0 && self.tolerance < 1.0) {
            return Err(AuditError::InvalidConfig {
                detail: format!(
                    "tolerance must be within [0, 1), got {}",
                    self.tolerance
                ),
            });
        }
        if self.current_year == self.prior_year {
            return Err(AuditError::InvalidConfig {
                detail: format!(
                    "current_year and prior_year must differ, both are {}",
                    self.current_year
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AuditConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.current_year, 2026);
        assert_eq!(config.prior_year, 2025);
        assert_eq!(config.tolerance, 0.005);
        assert_eq!(config.max_row_errors, 0);
    }

    #[test]
    fn rejects_negative_or_nan_tolerance() {
        let mut config = AuditConfig {
            tolerance: -0.1,
            ..AuditConfig::default()
        };
        assert!(config.validate().is_err());
        config.tolerance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_equal_years() {
        let config = AuditConfig {
            prior_year: 2026,
            ..AuditConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: AuditConfig = serde_json::from_str("{\"tolerance\":0.01}").unwrap();
        assert_eq!(config.tolerance, 0.01);
        assert_eq!(config.current_year, 2026);
    }
}

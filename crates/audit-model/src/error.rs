use crate::currency::Currency;

/// Errors raised while normalizing inputs or preparing an audit run.
///
/// Every variant carries enough context to locate the offending input
/// without re-running: SKU, currency, year, row id, or column name.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error(
        "unrecognized currency {token:?}: expected an ISO code (USD, CAD, GBP, AUD, NZD, ZAR, EUR) or a known symbol"
    )]
    UnrecognizedCurrency { token: String },

    #[error("ambiguous currency in column header {header:?}: {detail}")]
    AmbiguousCurrency { header: String, detail: String },

    #[error("tier bands for {sku}/{currency}/{year} leave a gap: {detail}")]
    TierGap {
        sku: String,
        currency: Currency,
        year: i32,
        detail: String,
    },

    #[error("tier bands for {sku}/{currency}/{year} overlap: {detail}")]
    TierOverlap {
        sku: String,
        currency: Currency,
        year: i32,
        detail: String,
    },

    #[error("conflicting pricebook entries for {sku}/{currency}/{year}")]
    DuplicateKey {
        sku: String,
        currency: Currency,
        year: i32,
    },

    #[error("{table}: required column {column:?} not found (headers present: {found:?})")]
    MissingColumn {
        table: String,
        column: String,
        found: Vec<String>,
    },

    #[error("{stage}: expected {expected} rows, got {actual}")]
    RowCountMismatch {
        stage: String,
        expected: usize,
        actual: usize,
    },

    #[error("audit output failed validation: {detail}")]
    AuditInvariant { detail: String },

    #[error("billing normalization left {errors} row errors (limit {limit}); not auditing a partial export")]
    RowLimit { errors: usize, limit: usize },

    #[error("pricebook normalization produced no entries")]
    EmptyPricebook,

    #[error("billing export contains no data rows")]
    EmptyBilling,

    #[error("invalid configuration: {detail}")]
    InvalidConfig { detail: String },
}

pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = AuditError::TierGap {
            sku: "SKU-9".to_string(),
            currency: Currency::Eur,
            year: 2026,
            detail: "band [6, 20] is followed by band starting at 30".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "tier bands for SKU-9/EUR/2026 leave a gap: band [6, 20] is followed by band starting at 30"
        );

        let err = AuditError::MissingColumn {
            table: "billing export".to_string(),
            column: "net_value".to_string(),
            found: vec!["Material".to_string(), "Qty".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("net_value"));
        assert!(message.contains("Material"));
    }
}

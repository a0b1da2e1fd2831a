use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuditError;

/// Currencies the vendor pricebook is published in.
///
/// The set is closed on purpose: a billing row in any other currency is a
/// data problem that has to surface as an error, not a new enum case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Cad,
    Gbp,
    Aud,
    Nzd,
    Zar,
    Eur,
}

impl Currency {
    /// Every supported currency, in pricebook column order.
    pub const ALL: [Currency; 7] = [
        Currency::Usd,
        Currency::Cad,
        Currency::Gbp,
        Currency::Aud,
        Currency::Nzd,
        Currency::Zar,
        Currency::Eur,
    ];

    /// ISO 4217 code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Cad => "CAD",
            Currency::Gbp => "GBP",
            Currency::Aud => "AUD",
            Currency::Nzd => "NZD",
            Currency::Zar => "ZAR",
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "CAD" => Ok(Currency::Cad),
            "GBP" => Ok(Currency::Gbp),
            "AUD" => Ok(Currency::Aud),
            "NZD" => Ok(Currency::Nzd),
            "ZAR" => Ok(Currency::Zar),
            "EUR" => Ok(Currency::Eur),
            _ => Err(format!("Unknown currency code: {}", s)),
        }
    }
}

/// Parse a currency out of a single cell value.
///
/// ISO codes win over symbols: a cell like `"£ GBP"` is GBP because of the
/// code, not the symbol. Symbols are consulted only when no code is present,
/// and a bare `$` is rejected outright since USD, CAD, AUD, and NZD all
/// print one. Never defaults; unknown tokens are an error the caller has to
/// deal with.
pub fn parse_currency(token: &str) -> Result<Currency, AuditError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(AuditError::UnrecognizedCurrency {
            token: token.to_string(),
        });
    }
    let upper = trimmed.to_uppercase();

    // Pass 1: ISO code as its own word anywhere in the cell.
    for word in upper.split(|c: char| !c.is_ascii_alphanumeric()) {
        if let Ok(currency) = word.parse::<Currency>() {
            return Ok(currency);
        }
    }

    // Pass 2: symbol notation. NZ$ must be checked before A$ before $.
    if upper.contains('£') {
        return Ok(Currency::Gbp);
    }
    if upper.contains('€') {
        return Ok(Currency::Eur);
    }
    if upper.contains("NZ$") {
        return Ok(Currency::Nzd);
    }
    // A$ only when not the tail of a longer token (CA$ is not in the set).
    if let Some(idx) = upper.find("A$") {
        let preceded = upper[..idx]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric());
        if !preceded {
            return Ok(Currency::Aud);
        }
    }
    // Standalone R is the common ZAR shorthand; R inside a longer token is not.
    if upper == "R" {
        return Ok(Currency::Zar);
    }

    Err(AuditError::UnrecognizedCurrency {
        token: token.to_string(),
    })
}

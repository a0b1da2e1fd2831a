//! Header vocabulary for pricebook column discovery.
//!
//! Vendor pricebooks rename columns every quarter; detection works off
//! token signals rather than exact names. All tokens are matched as
//! uppercase substrings of the normalized header.

use audit_model::Currency;

/// Score for an unambiguous currency token (ISO code, full name).
pub const STRONG_SIGNAL: i32 = 10;
/// Score for a currency symbol.
pub const SYMBOL_SIGNAL: i32 = 8;
/// Score for a country shorthand that rides along in headers (US, UK, NZ).
pub const WEAK_SIGNAL: i32 = 3;
/// Minimum lead the winning currency needs over the runner-up; anything
/// closer is ambiguous and refuses to guess.
pub const AMBIGUITY_MARGIN: i32 = 3;

/// Signal tokens for one currency.
pub struct CurrencySignals {
    pub currency: Currency,
    pub strong: &'static [&'static str],
    pub symbols: &'static [&'static str],
    pub weak: &'static [&'static str],
    /// Any of these present in the header vetoes the currency outright
    /// (keeps `A$` from firing inside `CA$`, `AU` inside New Zealand
    /// headers, and so on).
    pub exclude: &'static [&'static str],
}

pub const CURRENCY_SIGNALS: [CurrencySignals; 7] = [
    CurrencySignals {
        currency: Currency::Usd,
        strong: &["USD", "US DOLLAR", "US$"],
        symbols: &[],
        weak: &["US"],
        exclude: &[],
    },
    CurrencySignals {
        currency: Currency::Cad,
        strong: &["CAD", "CANADIAN", "CDN"],
        symbols: &["C$", "CA$"],
        weak: &["CA"],
        exclude: &[],
    },
    CurrencySignals {
        currency: Currency::Gbp,
        strong: &["GBP", "POUND", "STERLING"],
        symbols: &["£"],
        weak: &["UK", "BRITISH"],
        exclude: &[],
    },
    CurrencySignals {
        currency: Currency::Aud,
        strong: &["AUD", "AUSTRALIA"],
        symbols: &["A$"],
        weak: &["AU"],
        exclude: &["NZ", "CA$"],
    },
    CurrencySignals {
        currency: Currency::Nzd,
        strong: &["NZD", "NEW ZEALAND"],
        symbols: &["NZ$"],
        weak: &["NZ"],
        exclude: &[],
    },
    CurrencySignals {
        currency: Currency::Zar,
        strong: &["ZAR", "RAND", "SOUTH AFRICA"],
        symbols: &[],
        weak: &["ZA"],
        exclude: &[],
    },
    CurrencySignals {
        currency: Currency::Eur,
        strong: &["EUR", "EURO"],
        symbols: &["€"],
        weak: &["EU"],
        exclude: &[],
    },
];

/// Headers naming the SKU column.
pub const SKU_TOKENS: &[&str] = &[
    "PART NUMBER",
    "PART NO",
    "PART #",
    "MATERIAL",
    "SKU",
    "ITEM NUMBER",
    "ITEM CODE",
    "PRODUCT CODE",
];

/// A band column header carries MIN/MAX plus one of these.
pub const BAND_CONTEXT_TOKENS: &[&str] = &[
    "TIER", "BAND", "QTY", "QUANTITY", "SEAT", "USER", "UNIT", "VOLUME",
];

/// Band vocabulary that marks a section as seat-based rather than
/// volume-tiered.
pub const SEAT_TOKENS: &[&str] = &["SEAT", "USER", "LICENSE", "LICENCE"];

/// Price-intent vocabulary: a header with one of these plus no detectable
/// currency is an error, not a column to skip.
pub const PRICE_TOKENS: &[&str] = &["PRICE", "RATE", "FEE", "COST"];

/// True when `header` (already uppercased) contains any of `tokens`.
pub fn contains_any(header: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| header.contains(token))
}

/// Substring match with word boundaries on both sides. Weak country
/// shorthands need this: `US` must fire in `US Price` but not inside
/// `CUSTOMER`.
pub fn contains_word(header: &str, token: &str) -> bool {
    let bytes = header.as_bytes();
    let mut start = 0;
    while let Some(pos) = header[start..].find(token) {
        let idx = start + pos;
        let before_ok = idx == 0 || !bytes[idx - 1].is_ascii_alphanumeric();
        let after = idx + token.len();
        let after_ok = after >= bytes.len() || !bytes[after].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return true;
        }
        start = idx + 1;
    }
    false
}

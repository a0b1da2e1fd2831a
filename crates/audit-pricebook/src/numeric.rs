//! Cell scrubbing for vendor number formats.

/// Cell values that mean "no price here". `TBD` included: a promised price
/// is not a price.
const EMPTY_TOKENS: &[&str] = &["", "-", "N/A", "NA", "NONE", "NAN", "NULL", "TBD"];

/// Custom-pricing markers. Matched after trimming and uppercasing; the
/// two prefixes catch the long-form variants vendors type by hand
/// ("Pricing based on contract terms", "Contract pricing").
fn is_custom_token(upper: &str) -> bool {
    upper == "CUSTOM"
        || upper == "PRICING BASED ON CONTRACT"
        || upper.starts_with("PRICING BASED")
        || upper.starts_with("CONTRACT")
}

pub fn is_custom_cell(cell: &str) -> bool {
    is_custom_token(&cell.trim().to_uppercase())
}

fn is_empty_token(upper: &str) -> bool {
    EMPTY_TOKENS.contains(&upper)
}

fn strip_vendor_formatting(cell: &str) -> String {
    let trimmed = cell.trim();
    // Leading R directly before a digit is the ZAR print format (R1,234.50).
    let without_rand = match trimmed.strip_prefix(['R', 'r']) {
        Some(rest) if rest.trim_start().starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => trimmed,
    };
    without_rand
        .chars()
        .filter(|c| !matches!(c, '$' | '£' | '€' | ',' | ' '))
        .collect()
}

/// Scrub one price cell to a positive rate.
///
/// Empty markers and custom markers produce `None` (custom is detected
/// separately). Zero and negative values are vendor noise in a price
/// column, not rates, and also produce `None`.
pub fn clean_price(cell: &str) -> Option<f64> {
    let upper = cell.trim().to_uppercase();
    if is_empty_token(&upper) || is_custom_token(&upper) {
        return None;
    }
    let cleaned = strip_vendor_formatting(cell);
    let value: f64 = cleaned.parse().ok()?;
    (value > 0.0).then_some(value)
}

/// Scrub one tier-band cell. Bands are non-negative quantities; zero is a
/// legitimate lower bound.
pub fn parse_band(cell: &str) -> Option<f64> {
    let upper = cell.trim().to_uppercase();
    if is_empty_token(&upper) {
        return None;
    }
    let cleaned = strip_vendor_formatting(cell);
    let value: f64 = cleaned.parse().ok()?;
    (value >= 0.0).then_some(value)
}

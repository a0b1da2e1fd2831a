//! Signal-scored currency and year detection for price column headers.

use audit_model::{AuditError, Currency};

use crate::patterns::{
    AMBIGUITY_MARGIN, CURRENCY_SIGNALS, STRONG_SIGNAL, SYMBOL_SIGNAL, WEAK_SIGNAL, contains_word,
};

/// Outcome of scoring one header against every supported currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedCurrency {
    pub currency: Currency,
    pub score: i32,
}

fn score_currency(header_upper: &str, signals: &crate::patterns::CurrencySignals) -> i32 {
    if signals
        .exclude
        .iter()
        .any(|token| header_upper.contains(token))
    {
        return 0;
    }
    let mut score = 0;
    for token in signals.strong {
        if header_upper.contains(token) {
            score += STRONG_SIGNAL;
        }
    }
    for token in signals.symbols {
        if header_upper.contains(token) {
            score += SYMBOL_SIGNAL;
        }
    }
    // Weak tokens only count as standalone words; US must not fire
    // inside CUSTOMER.
    for token in signals.weak {
        if contains_word(header_upper, token) {
            score += WEAK_SIGNAL;
        }
    }
    score
}

/// Score `header` against every currency.
///
/// `Ok(None)` means no currency signal at all (not a price column).
/// A contested result (runner-up within [`AMBIGUITY_MARGIN`] of the
/// winner) is an error rather than a guess.
pub fn detect_currency(header: &str) -> Result<Option<DetectedCurrency>, AuditError> {
    let upper = header.to_uppercase();
    let mut scored: Vec<DetectedCurrency> = CURRENCY_SIGNALS
        .iter()
        .map(|signals| DetectedCurrency {
            currency: signals.currency,
            score: score_currency(&upper, signals),
        })
        .filter(|detected| detected.score > 0)
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score).then(a.currency.cmp(&b.currency)));

    match scored.as_slice() {
        [] => Ok(None),
        [winner] => Ok(Some(*winner)),
        [winner, runner_up, ..] => {
            if winner.score - runner_up.score < AMBIGUITY_MARGIN {
                Err(AuditError::AmbiguousCurrency {
                    header: header.to_string(),
                    detail: format!(
                        "{} scored {}, {} scored {}",
                        winner.currency, winner.score, runner_up.currency, runner_up.score
                    ),
                })
            } else {
                Ok(Some(*winner))
            }
        }
    }
}

/// Which pricebook year a price column belongs to. Headers without a year
/// default to the current one; the caller logs that.
pub fn detect_year(header: &str, current_year: i32, prior_year: i32) -> Option<i32> {
    if header.contains(&current_year.to_string()) {
        Some(current_year)
    } else if header.contains(&prior_year.to_string()) {
        Some(prior_year)
    } else {
        None
    }
}

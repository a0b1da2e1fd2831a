//! Ordered classification policy.
//!
//! Flag precedence is a contract: reviewers read the flag distribution
//! month over month, and a row migrating between flags because two checks
//! swapped order is a regression. The policy is an explicit rule list
//! evaluated top to bottom, with the price comparison as the terminal
//! step that always decides.

use std::collections::BTreeSet;

use audit_model::{
    AuditConfig, AuditFlag, AuditResult, BillingRow, Currency, PriceEntry, Pricing,
};

use crate::resolve::relative_eq;

/// Everything a rule may inspect for one row. Lookup access and price
/// resolution happen once, before the rules run, so each rule stays a
/// pure predicate over this snapshot.
#[derive(Debug)]
pub struct RowContext<'a> {
    pub row: &'a BillingRow,
    pub config: &'a AuditConfig,
    /// Entry for (sku, row currency, current year).
    pub current: Option<&'a PriceEntry>,
    /// Entry for (sku, row currency, prior year).
    pub prior: Option<&'a PriceEntry>,
    /// True when the SKU appears in the pricebook under any key.
    pub sku_known: bool,
    /// Currencies the pricebook prices this SKU in.
    pub known_currencies: BTreeSet<Currency>,
    /// True when every pricebook entry for this SKU is contract-priced.
    pub all_entries_custom: bool,
    /// Contracted unit rate resolved for the row's quantity, per year.
    pub expected_current: Option<f64>,
    pub expected_prior: Option<f64>,
}

/// One ordered step of the policy. `None` passes the row to the next rule.
pub trait ClassifyRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, ctx: &RowContext<'_>) -> Option<AuditResult>;
}

fn unpriced(flag: AuditFlag, rationale: String) -> AuditResult {
    AuditResult {
        flag,
        matched_current_price: None,
        matched_prior_price: None,
        variance_vs_current: None,
        rationale,
    }
}

fn priced(ctx: &RowContext<'_>, flag: AuditFlag, rationale: String) -> AuditResult {
    AuditResult {
        flag,
        matched_current_price: ctx.expected_current,
        matched_prior_price: ctx.expected_prior,
        variance_vs_current: ctx
            .expected_current
            .map(|rate| ctx.row.billed_unit_price - rate),
        rationale,
    }
}

/// SKU absent from the pricebook entirely. Checked first: a credit or a
/// zero-dollar line on an unknown SKU is still an unknown SKU.
struct UnknownSku;

impl ClassifyRule for UnknownSku {
    fn name(&self) -> &'static str {
        "unknown-sku"
    }

    fn evaluate(&self, ctx: &RowContext<'_>) -> Option<AuditResult> {
        if ctx.sku_known {
            return None;
        }
        Some(unpriced(
            AuditFlag::NotInPricebook,
            format!(
                "{} is not in the pricebook under any currency or year",
                ctx.row.sku
            ),
        ))
    }
}

/// Contract-priced SKUs have no numeric rate to audit against. Fires when
/// either year's entry for the row's currency is custom (current
/// preferred), or when the SKU is priced only in other currencies and all
/// of those entries are custom.
struct ContractPriced;

impl ClassifyRule for ContractPriced {
    fn name(&self) -> &'static str {
        "contract-priced"
    }

    fn evaluate(&self, ctx: &RowContext<'_>) -> Option<AuditResult> {
        let custom_entry = [ctx.current, ctx.prior]
            .into_iter()
            .flatten()
            .find(|entry| entry.pricing.is_custom());
        if let Some(entry) = custom_entry {
            return Some(unpriced(
                AuditFlag::CustomPricing,
                format!("pricebook prices {} by contract", entry.key()),
            ));
        }
        if ctx.current.is_none() && ctx.prior.is_none() && ctx.all_entries_custom {
            return Some(unpriced(
                AuditFlag::CustomPricing,
                format!(
                    "every pricebook entry for {} is contract-priced",
                    ctx.row.sku
                ),
            ));
        }
        None
    }
}

/// Negative net value. Credits are never price-checked: the credited
/// amount follows the original invoice, not the pricebook.
struct CreditLine;

impl ClassifyRule for CreditLine {
    fn name(&self) -> &'static str {
        "credit"
    }

    fn evaluate(&self, ctx: &RowContext<'_>) -> Option<AuditResult> {
        if ctx.row.net_value >= 0.0 {
            return None;
        }
        Some(priced(
            ctx,
            AuditFlag::Credit,
            format!("net value {:.2} is a credit", ctx.row.net_value),
        ))
    }
}

/// Zero-dollar lines. A flat-priced SKU billed with quantity 0 is the
/// normal shape of a waived or bundled one-time fee; anything else billed
/// at zero needs a reviewer.
struct ZeroBilled;

impl ClassifyRule for ZeroBilled {
    fn name(&self) -> &'static str {
        "zero-billed"
    }

    fn evaluate(&self, ctx: &RowContext<'_>) -> Option<AuditResult> {
        if ctx.row.net_value != 0.0 {
            return None;
        }
        let flat = ctx
            .current
            .or(ctx.prior)
            .is_some_and(|entry| matches!(entry.pricing, Pricing::Flat { .. }));
        if flat && ctx.row.quantity == 0.0 {
            return Some(priced(
                ctx,
                AuditFlag::ZeroQtyFlatPrice,
                "zero-dollar line with quantity 0 on a flat-priced SKU".to_string(),
            ));
        }
        let rationale = match ctx.expected_current {
            Some(rate) => format!(
                "billed 0.00 against a {} rate of {rate:.2}",
                ctx.config.current_year
            ),
            None => "billed 0.00 with no current-year rate to compare".to_string(),
        };
        Some(priced(ctx, AuditFlag::BilledAtZero, rationale))
    }
}

/// SKU known to the pricebook, but not priced in the row's currency for
/// either year. A pricebook gap, not a billing error.
struct CurrencyGap;

impl ClassifyRule for CurrencyGap {
    fn name(&self) -> &'static str {
        "currency-gap"
    }

    fn evaluate(&self, ctx: &RowContext<'_>) -> Option<AuditResult> {
        if ctx.current.is_some() || ctx.prior.is_some() {
            return None;
        }
        let available = ctx
            .known_currencies
            .iter()
            .map(Currency::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Some(unpriced(
            AuditFlag::NoPricebookCurrency,
            format!(
                "{} is priced in {} but not in {}",
                ctx.row.sku, available, ctx.row.currency
            ),
        ))
    }
}

/// Terminal step: compare the billed unit price against both years.
pub struct PriceComparison;

impl PriceComparison {
    /// Always decides; every earlier rule has already passed on the row.
    pub fn decide(&self, ctx: &RowContext<'_>) -> AuditResult {
        let billed = ctx.row.billed_unit_price;
        let tolerance = ctx.config.tolerance;
        let current_year = ctx.config.current_year;
        let prior_year = ctx.config.prior_year;

        let matches_current = ctx
            .expected_current
            .is_some_and(|rate| relative_eq(billed, rate, tolerance));
        let matches_prior = ctx
            .expected_prior
            .is_some_and(|rate| relative_eq(billed, rate, tolerance));

        if matches_current
            && matches_prior
            && let (Some(current_rate), Some(prior_rate)) =
                (ctx.expected_current, ctx.expected_prior)
            && relative_eq(current_rate, prior_rate, tolerance)
        {
            return priced(
                ctx,
                AuditFlag::PriceUnchanged,
                format!(
                    "billed {billed:.2} matches the rate {current_rate:.2}, unchanged from {prior_year} to {current_year}"
                ),
            );
        }
        if matches_current
            && let Some(rate) = ctx.expected_current
        {
            return priced(
                ctx,
                AuditFlag::Correct2026,
                format!("billed {billed:.2} matches the {current_year} rate {rate:.2}"),
            );
        }
        if matches_prior
            && let Some(rate) = ctx.expected_prior
        {
            let current_side = match ctx.expected_current {
                Some(rate) => format!("the {current_year} rate is {rate:.2}"),
                None => format!("no {current_year} rate exists"),
            };
            return priced(
                ctx,
                AuditFlag::OldPrice2025,
                format!("billed {billed:.2} matches the {prior_year} rate {rate:.2}; {current_side}"),
            );
        }
        if ctx.expected_current.is_none() && ctx.expected_prior.is_none() {
            return priced(
                ctx,
                AuditFlag::NoMatch,
                format!("no published rate covers quantity {}", ctx.row.quantity),
            );
        }
        let compared = [
            (current_year, ctx.expected_current),
            (prior_year, ctx.expected_prior),
        ]
        .into_iter()
        .map(|(year, rate)| match rate {
            Some(rate) => format!("{year} rate {rate:.2}"),
            None => format!("no {year} rate"),
        })
        .collect::<Vec<_>>()
        .join(", ");
        priced(
            ctx,
            AuditFlag::NoMatch,
            format!("billed {billed:.2} matches neither year ({compared})"),
        )
    }
}

impl ClassifyRule for PriceComparison {
    fn name(&self) -> &'static str {
        "price-comparison"
    }

    fn evaluate(&self, ctx: &RowContext<'_>) -> Option<AuditResult> {
        Some(self.decide(ctx))
    }
}

/// The ordered policy: screening rules that may pass, then the terminal
/// comparison. Total over every row by construction.
pub struct ClassificationPolicy {
    screens: Vec<Box<dyn ClassifyRule>>,
    terminal: PriceComparison,
}

impl ClassificationPolicy {
    /// The contract ordering. Unknown SKU comes before everything else;
    /// custom pricing beats credit; credit beats the zero checks; the
    /// currency gap is only reported for rows that survived all of those.
    pub fn standard() -> Self {
        Self {
            screens: vec![
                Box::new(UnknownSku),
                Box::new(ContractPriced),
                Box::new(CreditLine),
                Box::new(ZeroBilled),
                Box::new(CurrencyGap),
            ],
            terminal: PriceComparison,
        }
    }

    /// Rule names in evaluation order, for logs and the flags legend.
    pub fn rule_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.screens.iter().map(|rule| rule.name()).collect();
        names.push(self.terminal.name());
        names
    }

    /// Run the policy over one row. First matching rule wins.
    pub fn decide(&self, ctx: &RowContext<'_>) -> AuditResult {
        for rule in &self.screens {
            if let Some(result) = rule.evaluate(ctx) {
                return result;
            }
        }
        self.terminal.decide(ctx)
    }
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

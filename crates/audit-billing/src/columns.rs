//! Column role mapping for billing exports.
//!
//! ERP billing exports name the same columns a dozen ways (`Curr.`,
//! `Order Quant.`, `Net Value`). Each role carries an ordered pattern
//! list; resolution prefers an exact header match over a substring hit so
//! `Material` beats `Material Description`, and a column claimed by one
//! role is never reused by another.

use audit_ingest::{HeaderHints, RawTable};
use audit_model::{AuditError, Result};
use tracing::debug;

const SKU_PATTERNS: &[&str] = &["MATERIAL", "PART NUMBER", "SKU", "ITEM"];

const QUANTITY_PATTERNS: &[&str] = &[
    "BILLED QUANTITY",
    "ORDER QUANT",
    "ORDER QTY",
    "QUANTITY",
    "QTY",
];

const NET_VALUE_PATTERNS: &[&str] = &[
    "NET VALUE",
    "NETVALUE",
    "NET VAL",
    "NET AMOUNT",
    "AMOUNT",
    "TOTAL",
];

const CURRENCY_PATTERNS: &[&str] = &["CURRENCY", "CURR"];

/// Descriptive columns carried through to reports when present. Optional:
/// an export without any of these still audits fine.
const CONTEXT_PATTERNS: &[&str] = &[
    "CUSTOMER",
    "NAME",
    "DOCUMENT",
    "ORDER",
    "DATE",
    "DESCRIPTION",
    "PLANT",
    "ORG",
    "SOLD",
    "SHIP",
    "ADDRESS",
    "STATUS",
    "CREATED",
];

/// Resolved column positions for one billing export.
#[derive(Debug, Clone)]
pub struct BillingColumns {
    pub sku: usize,
    pub quantity: usize,
    pub net_value: usize,
    pub currency: usize,
    /// Carried-through descriptive columns as (index, header), in sheet order.
    pub context: Vec<(usize, String)>,
}

/// Hints for locating the header row of a billing export.
pub fn header_hints() -> HeaderHints {
    HeaderHints::new(&["MATERIAL", "NET VALUE", "BILLED QUANTITY", "CURR"], 4)
}

/// Header key used for pattern matching: uppercased, dots dropped,
/// underscores read as spaces, whitespace collapsed. Turns `Curr.` into
/// `CURR` and `Sold_To_Party` into `SOLD TO PARTY`.
fn role_key(header: &str) -> String {
    let upper = header.to_uppercase().replace('.', "").replace('_', " ");
    upper.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn resolve_role(keys: &[String], claimed: &[bool], patterns: &[&str]) -> Option<usize> {
    // Exact pass over every pattern first, so a terse header like `Qty`
    // wins over a longer column that merely contains a pattern.
    for pattern in patterns {
        for (idx, key) in keys.iter().enumerate() {
            if !claimed[idx] && key.as_str() == *pattern {
                return Some(idx);
            }
        }
    }
    for pattern in patterns {
        for (idx, key) in keys.iter().enumerate() {
            if !claimed[idx] && key.contains(pattern) {
                return Some(idx);
            }
        }
    }
    None
}

/// Map the export's headers onto the four required roles, then sweep the
/// unclaimed remainder for context columns.
///
/// Every missing role is named in one error rather than failing on the
/// first gap, so a bad export needs one round trip to fix, not four.
pub fn resolve_columns(table: &RawTable) -> Result<BillingColumns> {
    let keys: Vec<String> = table.headers.iter().map(|h| role_key(h)).collect();
    let mut claimed = vec![false; keys.len()];

    let roles: [(&str, &[&str]); 4] = [
        ("sku", SKU_PATTERNS),
        ("quantity", QUANTITY_PATTERNS),
        ("net_value", NET_VALUE_PATTERNS),
        ("currency", CURRENCY_PATTERNS),
    ];
    let mut resolved = [None; 4];
    let mut missing = Vec::new();
    for (slot, (role, patterns)) in roles.into_iter().enumerate() {
        match resolve_role(&keys, &claimed, patterns) {
            Some(idx) => {
                claimed[idx] = true;
                resolved[slot] = Some(idx);
            }
            None => missing.push(role),
        }
    }
    if !missing.is_empty() {
        return Err(AuditError::MissingColumn {
            table: "billing export".to_string(),
            column: missing.join(", "),
            found: table.headers.clone(),
        });
    }
    let [sku, quantity, net_value, currency] = resolved.map(Option::unwrap_or_default);

    let mut context = Vec::new();
    for (idx, key) in keys.iter().enumerate() {
        if claimed[idx] {
            continue;
        }
        if CONTEXT_PATTERNS.iter().any(|pattern| key.contains(pattern)) {
            context.push((idx, table.headers[idx].clone()));
        }
    }

    debug!(
        section = %table.name,
        sku = %table.headers[sku],
        quantity = %table.headers[quantity],
        net_value = %table.headers[net_value],
        currency = %table.headers[currency],
        context = context.len(),
        "mapped billing columns"
    );

    Ok(BillingColumns {
        sku,
        quantity,
        net_value,
        currency,
        context,
    })
}

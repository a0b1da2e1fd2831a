//! Billing export normalization.
//!
//! Takes the raw billing table (ERP exports with junk rows above the
//! header and vendor-specific column names), maps columns onto roles, and
//! standardizes every data row into a [`audit_model::BillingRow`] or a
//! [`audit_model::RowError`].

pub mod columns;
pub mod normalize;

pub use columns::{BillingColumns, header_hints, resolve_columns};
pub use normalize::{BillingNormalization, normalize_billing, standardize_row};

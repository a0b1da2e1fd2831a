//! The audit classifier.
//!
//! Joins standardized billing rows against the normalized price lookup for
//! two pricing years and assigns exactly one audit flag per row through an
//! ordered decision policy. Pure batch computation: no I/O, no shared
//! mutable state, same inputs always produce the same flags.

pub mod classify;
pub mod policy;
pub mod resolve;
pub mod summarize;

pub use classify::AuditClassifier;
pub use policy::{ClassificationPolicy, ClassifyRule, RowContext};
pub use resolve::{relative_eq, resolve_price};
pub use summarize::summarize;

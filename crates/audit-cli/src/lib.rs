//! CLI library components for the billing audit.

pub mod config;
pub mod logging;
pub mod pipeline;

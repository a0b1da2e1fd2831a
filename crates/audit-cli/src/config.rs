//! Loading and overriding audit settings.
//!
//! Settings come in three layers: built-in defaults, an optional
//! `audit.toml`, and per-flag command-line overrides. Later layers win.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use audit_model::AuditConfig;

/// Config filename probed in the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "audit.toml";

/// Per-flag command-line overrides applied on top of the loaded config.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides {
    pub current_year: Option<i32>,
    pub prior_year: Option<i32>,
    pub tolerance: Option<f64>,
    pub max_row_errors: Option<usize>,
}

/// Load the audit config.
///
/// An explicit `--config` path must exist and parse. Without one, the
/// default file is probed and silently skipped when absent.
pub fn load_config(explicit: Option<&Path>) -> Result<AuditConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(error) if !required && error.kind() == ErrorKind::NotFound => {
            debug!("no {DEFAULT_CONFIG_FILE} found; using built-in defaults");
            return Ok(AuditConfig::default());
        }
        Err(error) => {
            return Err(error).with_context(|| format!("read config {}", path.display()));
        }
    };
    let config: AuditConfig =
        toml::from_str(&contents).with_context(|| format!("parse config {}", path.display()))?;
    info!(path = %path.display(), "loaded audit config");
    Ok(config)
}

/// Apply command-line overrides to a loaded config.
pub fn apply_overrides(config: &mut AuditConfig, overrides: &ConfigOverrides) {
    if let Some(year) = overrides.current_year {
        config.current_year = year;
    }
    if let Some(year) = overrides.prior_year {
        config.prior_year = year;
    }
    if let Some(tolerance) = overrides.tolerance {
        config.tolerance = tolerance;
    }
    if let Some(limit) = overrides.max_row_errors {
        config.max_row_errors = limit;
    }
}

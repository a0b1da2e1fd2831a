//! CLI argument definitions for the billing audit.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "billing-audit",
    version,
    about = "Pricebook Audit - Reconcile billing exports against the annual pricebook",
    long_about = "Reconcile a billing system export against the published pricebook.\n\n\
                  Every billing row is flagged against the current and prior year\n\
                  prices and the run produces CSV/JSON report artifacts plus a\n\
                  one-line run history entry."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Audit a billing export against the pricebook sections.
    Run(RunArgs),

    /// List all audit flags and what each one means.
    Flags,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory of exported pricebook sections (one CSV per sheet).
    #[arg(value_name = "PRICEBOOK_DIR")]
    pub pricebook: PathBuf,

    /// Billing system export to audit (CSV).
    #[arg(value_name = "BILLING_CSV")]
    pub billing: PathBuf,

    /// Output directory for report artifacts (default: audit_output).
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Path to a TOML config file (default: audit.toml when present).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Current pricebook year to audit against (overrides config).
    #[arg(long = "current-year", value_name = "YEAR")]
    pub current_year: Option<i32>,

    /// Prior pricebook year used to spot stale pricing (overrides config).
    #[arg(long = "prior-year", value_name = "YEAR")]
    pub prior_year: Option<i32>,

    /// Price comparison tolerance as a fraction of a currency unit (overrides config).
    #[arg(long = "tolerance", value_name = "FRACTION")]
    pub tolerance: Option<f64>,

    /// Malformed billing rows to tolerate before the run aborts (overrides config).
    #[arg(long = "max-row-errors", value_name = "N")]
    pub max_row_errors: Option<usize>,

    /// Classify and summarize without writing report artifacts.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Skip appending this run to the run history log.
    #[arg(long = "no-history")]
    pub no_history: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

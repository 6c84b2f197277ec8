//! Command-line parsing for the economic data dashboard.
//!
//! Flags only seed the input widgets and the runtime settings; the values are
//! validated by the first update cycle, not here.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_END, DEFAULT_LOG_FILE, DEFAULT_SERIES, DEFAULT_START, DEFAULT_TIMEOUT_SECS};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "econ", version, about = "Interactive FRED economic data graph")]
pub struct Cli {
    /// FRED series identifier shown on startup (e.g. GDPC1, UNRATE).
    #[arg(short = 's', long, default_value = DEFAULT_SERIES)]
    pub series: String,

    /// Start date shown on startup.
    #[arg(long, default_value = DEFAULT_START)]
    pub start: String,

    /// End date shown on startup.
    #[arg(long, default_value = DEFAULT_END)]
    pub end: String,

    /// HTTP timeout in seconds for each fetch (0 waits indefinitely).
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// File that receives log output (the terminal belongs to the UI).
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - builds the FRED client
//! - hands everything to the TUI session

use clap::Parser;
use tracing::info;

use crate::cli::Cli;
use crate::config::DashboardConfig;
use crate::data::FredClient;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `econ` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = DashboardConfig::from_cli(&cli);

    crate::logging::init(&config.log_file)?;
    info!(series = %config.series, start = %config.start, end = %config.end, "starting dashboard");

    let client = FredClient::from_env(config.timeout)?;
    if !client.uses_api_key() {
        info!("FRED_API_KEY not set; using the public CSV endpoint");
    }

    crate::tui::run(&config, client)
}

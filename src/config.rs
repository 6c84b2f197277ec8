//! Resolved runtime settings and fixed dashboard constants.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::session::Inputs;

pub const DEFAULT_SERIES: &str = "GDPC1";
pub const DEFAULT_START: &str = "1951-11-01";
pub const DEFAULT_END: &str = "2016-11-1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILE: &str = "econ.log";

pub const PAGE_TITLE: &str = "Economic Data Graph";
pub const X_LABEL: &str = "Date";
pub const Y_LABEL: &str = "Value";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub series: String,
    pub start: String,
    pub end: String,
    /// `None` disables the HTTP timeout.
    pub timeout: Option<Duration>,
    pub log_file: PathBuf,
}

impl DashboardConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let timeout = (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs));
        Self {
            series: cli.series.clone(),
            start: cli.start.clone(),
            end: cli.end.clone(),
            timeout,
            log_file: cli.log_file.clone(),
        }
    }

    /// Widget values at startup.
    pub fn initial_inputs(&self) -> Inputs {
        Inputs::new(self.series.clone(), self.start.clone(), self.end.clone())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            series: DEFAULT_SERIES.to_string(),
            start: DEFAULT_START.to_string(),
            end: DEFAULT_END.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::domain::Preset;

    #[test]
    fn zero_timeout_disables_it() {
        let cli = Cli::parse_from(["econ", "--timeout-secs", "0"]);
        assert_eq!(DashboardConfig::from_cli(&cli).timeout, None);

        let cli = Cli::parse_from(["econ", "--timeout-secs", "5"]);
        assert_eq!(DashboardConfig::from_cli(&cli).timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn cli_defaults_equal_config_defaults() {
        let cli = Cli::parse_from(["econ"]);
        assert_eq!(DashboardConfig::from_cli(&cli), DashboardConfig::default());
    }

    #[test]
    fn initial_inputs_start_on_real_gdp() {
        let inputs = DashboardConfig::default().initial_inputs();
        assert_eq!(inputs.series, Preset::RealGdp.series_id());
        assert_eq!(inputs.preset, Preset::RealGdp);
        assert_eq!(inputs.start, "1951-11-01");
        assert_eq!(inputs.end, "2016-11-1");
    }
}

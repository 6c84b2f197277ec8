//! Error types.
//!
//! Two layers:
//!
//! - [`PipelineError`]: the typed, user-facing failures of a single update
//!   cycle. Each variant carries a fixed message that is shown verbatim.
//! - [`AppError`]: process-level failures (terminal, logging, HTTP client
//!   setup) that end the program with an exit code.

/// Failure of one `DataPipeline` run.
///
/// The variant is the error kind; `Display` yields the fixed human-readable
/// message for that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Start date is not formatted correctly.")]
    InvalidStartDate,
    #[error("End date is not formatted correctly.")]
    InvalidEndDate,
    #[error(
        "Data retrieval failed. Double check that the series is valid. \
         If it's valid, check your internet connection."
    )]
    FetchFailed,
}

impl PipelineError {
    /// Message formatted for the error-display surface.
    pub fn display_text(&self) -> String {
        format!("An error occurred: {self}")
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

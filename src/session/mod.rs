//! Per-session state shared between the widgets and the update cycle.
//!
//! A [`Session`] is the explicit context for one running dashboard: the raw
//! input values, the plot data source, and the error display text. It is
//! owned by an [`UpdateController`], which is the only thing that writes the
//! plot or the error text.

pub mod controller;
pub mod plot_state;

pub use controller::{CycleOutcome, CycleState, SessionEvent, UpdateController};
pub use plot_state::{PlotState, TOOLTIP_LABEL};

use crate::domain::Preset;

/// Current values of the input widgets, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub series: String,
    pub start: String,
    pub end: String,
    pub preset: Preset,
}

impl Inputs {
    pub fn new(series: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            series: series.into(),
            start: start.into(),
            end: end.into(),
            preset: Preset::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub inputs: Inputs,
    plot: PlotState,
    error_text: String,
}

impl Session {
    pub fn new(inputs: Inputs) -> Self {
        Self {
            inputs,
            plot: PlotState::default(),
            error_text: String::new(),
        }
    }

    pub fn plot(&self) -> &PlotState {
        &self.plot
    }

    /// Text of the error display; empty when the last cycle succeeded.
    pub fn error_text(&self) -> &str {
        &self.error_text
    }
}

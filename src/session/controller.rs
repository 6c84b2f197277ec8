//! The reactive update cycle.
//!
//! Every event runs one complete cycle, `Idle -> Running -> Idle`:
//!
//! 1. read the three raw inputs
//! 2. run the fetch pipeline
//! 3. on success replace the plot table and clear the error display
//! 4. on failure write the error display and leave the plot untouched
//!
//! A cycle never propagates a failure. Panics inside the pipeline are caught
//! and reported as unexpected errors so the session keeps running.

use std::panic::{self, AssertUnwindSafe};

use tracing::{error, info};

use crate::app::pipeline;
use crate::data::SeriesSource;
use crate::domain::Preset;
use crate::error::PipelineError;
use crate::session::Session;

/// Events from the widget layer that start a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The "Graph" trigger was clicked.
    Regenerate,
    /// A preset was picked in the selector.
    PresetChanged(Preset),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Running,
}

/// What a cycle did, for the caller's status line.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Updated { rows: usize },
    Failed(PipelineError),
    Fault(String),
}

pub struct UpdateController<S> {
    source: S,
    session: Session,
    state: CycleState,
}

impl<S: SeriesSource> UpdateController<S> {
    pub fn new(source: S, session: Session) -> Self {
        Self {
            source,
            session,
            state: CycleState::Idle,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access for the widget layer. The plot and error text stay
    /// read-only outside this module.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn handle(&mut self, event: SessionEvent) -> CycleOutcome {
        match event {
            SessionEvent::Regenerate => self.run_cycle(),
            SessionEvent::PresetChanged(preset) => self.select_preset(preset),
        }
    }

    /// Write the preset's identifier into the series input, then run the
    /// same cycle as the trigger.
    pub fn select_preset(&mut self, preset: Preset) -> CycleOutcome {
        self.session.inputs.preset = preset;
        self.session.inputs.series = preset.series_id().to_string();
        self.run_cycle()
    }

    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.state = CycleState::Running;
        let inputs = self.session.inputs.clone();
        info!(series = %inputs.series, start = %inputs.start, end = %inputs.end, "update cycle");

        let source = &self.source;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pipeline::run(source, &inputs.series, &inputs.start, &inputs.end)
        }));

        let outcome = match result {
            Ok(Ok(table)) => {
                let rows = table.len();
                self.session.plot.replace(table);
                self.session.error_text.clear();
                CycleOutcome::Updated { rows }
            }
            Ok(Err(err)) => {
                self.session.error_text = err.display_text();
                CycleOutcome::Failed(err)
            }
            Err(payload) => {
                let message = panic_message(&*payload);
                error!("update cycle panicked: {message}");
                self.session.error_text = unexpected_error_text(&message);
                CycleOutcome::Fault(message)
            }
        };

        self.state = CycleState::Idle;
        outcome
    }
}

pub fn unexpected_error_text(message: &str) -> String {
    format!("An unexpected error occurred with error message: {message}")
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - fetch request types (`SeriesId`, `DateRange`)
//! - the raw and cleaned series tables (`RawSeriesTable`, `CleanSeriesTable`)
//! - the preset catalog (`Preset`)

pub mod types;

pub use types::*;

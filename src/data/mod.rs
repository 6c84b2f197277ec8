//! Data acquisition: date parsing, FRED retrieval, and table cleanup.

pub mod clean;
pub mod dates;
pub mod fred;

pub use clean::clean_series;
pub use dates::{InvalidDate, parse_date};
pub use fred::{FetchError, FredClient};

use crate::domain::{DateRange, RawSeriesTable, SeriesId};

/// Something that can retrieve a raw series for a date window.
///
/// Implementations perform at most one round trip per call and never retry.
pub trait SeriesSource {
    fn fetch(&self, id: &SeriesId, range: DateRange) -> Result<RawSeriesTable, FetchError>;
}

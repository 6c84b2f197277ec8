//! Shared "fetch pipeline" used by every front-end.
//!
//! parse start -> parse end -> fetch -> clean
//!
//! The first failing step short-circuits the rest, and every failure leaves
//! this module as a [`PipelineError`]. In particular both dates are checked
//! before any network traffic, and a bad start date is always reported ahead
//! of a bad end date.

use tracing::{info, warn};

use crate::data::{SeriesSource, clean_series, parse_date};
use crate::domain::{CleanSeriesTable, DateRange, SeriesId};
use crate::error::PipelineError;

/// Turn raw user strings into a cleaned series table.
pub fn run(
    source: &dyn SeriesSource,
    series_raw: &str,
    start_raw: &str,
    end_raw: &str,
) -> Result<CleanSeriesTable, PipelineError> {
    let start = parse_date(start_raw).map_err(|e| {
        info!("rejected start date: {e}");
        PipelineError::InvalidStartDate
    })?;
    let end = parse_date(end_raw).map_err(|e| {
        info!("rejected end date: {e}");
        PipelineError::InvalidEndDate
    })?;

    // An empty identifier can only ever fail upstream; skip the round trip.
    let Some(id) = SeriesId::parse(series_raw) else {
        warn!("empty series identifier");
        return Err(PipelineError::FetchFailed);
    };

    let range = DateRange::new(start, end);
    let raw = source.fetch(&id, range).map_err(|e| {
        warn!(series = %id, "{e}");
        PipelineError::FetchFailed
    })?;

    let table = clean_series(raw);
    info!(series = %id, %start, %end, rows = table.len(), "series loaded");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use chrono::NaiveDate;

    use super::*;
    use crate::data::FetchError;
    use crate::domain::RawSeriesTable;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Records every request and answers with a fixed table.
    struct RecordingSource {
        calls: Cell<usize>,
        last: RefCell<Option<(SeriesId, DateRange)>>,
        fail: bool,
    }

    impl RecordingSource {
        fn ok() -> Self {
            Self {
                calls: Cell::new(0),
                last: RefCell::new(None),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self { fail: true, ..Self::ok() }
        }
    }

    impl SeriesSource for RecordingSource {
        fn fetch(&self, id: &SeriesId, range: DateRange) -> Result<RawSeriesTable, FetchError> {
            self.calls.set(self.calls.get() + 1);
            *self.last.borrow_mut() = Some((id.clone(), range));
            if self.fail {
                return Err(FetchError::Status {
                    status: 400,
                    detail: "Bad Request.  The series does not exist.".to_string(),
                });
            }
            Ok(RawSeriesTable::new(
                id.as_str(),
                vec![(d(2016, 7, 1), Some(1.0)), (d(2016, 10, 1), None), (d(2017, 1, 1), Some(2.0))],
            ))
        }
    }

    #[test]
    fn bad_start_date_fails_before_any_fetch() {
        let source = RecordingSource::ok();
        for start in ["not-a-date", "", "2016-02-30", "soon"] {
            let err = run(&source, "GDPC1", start, "2016-11-01").unwrap_err();
            assert_eq!(err, PipelineError::InvalidStartDate);
        }
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn start_date_error_wins_when_both_dates_are_bad() {
        let source = RecordingSource::ok();
        let err = run(&source, "GDPC1", "garbage", "also garbage").unwrap_err();
        assert_eq!(err, PipelineError::InvalidStartDate);
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn bad_end_date_with_good_start() {
        let source = RecordingSource::ok();
        let err = run(&source, "GDPC1", "1951-11-01", "not-a-date").unwrap_err();
        assert_eq!(err, PipelineError::InvalidEndDate);
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn fetch_failure_is_classified() {
        let source = RecordingSource::failing();
        let err = run(&source, "NOT_A_SERIES", "1951-11-01", "2016-11-01").unwrap_err();
        assert_eq!(err, PipelineError::FetchFailed);
        assert_eq!(source.calls.get(), 1, "exactly one fetch, no retries");
    }

    #[test]
    fn blank_series_is_a_fetch_failure() {
        let source = RecordingSource::ok();
        let err = run(&source, "   ", "1951-11-01", "2016-11-01").unwrap_err();
        assert_eq!(err, PipelineError::FetchFailed);
    }

    #[test]
    fn success_trims_series_and_cleans_rows() {
        let source = RecordingSource::ok();
        let table = run(&source, "  GDPC1 ", " 1951-11-01", "2016-11-1 ").unwrap();

        let (id, range) = source.last.borrow().clone().unwrap();
        assert_eq!(id.as_str(), "GDPC1");
        assert_eq!(range, DateRange::new(d(1951, 11, 1), d(2016, 11, 1)));

        assert_eq!(table.columns(), ["date", "values"]);
        assert_eq!(table.values(), &[1.0, 2.0]);
    }

    #[test]
    fn reversed_range_is_passed_through() {
        let source = RecordingSource::ok();
        run(&source, "UNRATE", "2020-01-01", "2010-01-01").unwrap();
        let (_, range) = source.last.borrow().clone().unwrap();
        assert!(range.start > range.end);
    }

    /// Hits the live FRED service; run with `cargo test -- --ignored`.
    #[test]
    #[ignore]
    fn live_gdpc1_is_clean_and_chronological() {
        let client = crate::data::FredClient::from_env(Some(std::time::Duration::from_secs(30))).unwrap();
        let table = run(&client, "GDPC1", "1951-11-01", "2016-11-01").unwrap();
        assert!(!table.is_empty());
        assert_eq!(table.columns(), ["date", "values"]);
        assert!(table.dates().windows(2).all(|w| w[0] < w[1]), "dates must ascend");
        assert!(table.values().iter().all(|v| v.is_finite()));
    }
}

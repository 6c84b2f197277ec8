//! Normalize a raw service table into the canonical `date` / `values` shape.

use tracing::debug;

use crate::domain::{CleanSeriesTable, RawSeriesTable, VALUES_COLUMN};

/// Rename the value column to `values`, materialize the date index as the
/// `date` column, and drop rows with a missing value.
///
/// Row order is preserved. An empty result is valid.
pub fn clean_series(raw: RawSeriesTable) -> CleanSeriesTable {
    let total = raw.len();
    if raw.column != VALUES_COLUMN {
        debug!(from = %raw.column, to = VALUES_COLUMN, "renaming value column");
    }

    let table = CleanSeriesTable::from_rows(
        raw.rows
            .into_iter()
            .filter_map(|(date, value)| value.map(|v| (date, v))),
    );

    if table.len() < total {
        debug!(dropped = total - table.len(), kept = table.len(), "dropped rows with missing values");
    }
    table
}

//! Shared domain types.
//!
//! The remote service hands back loosely shaped tables; inside the crate we
//! only ever pass these fixed-shape types around:
//!
//! - [`SeriesId`] / [`DateRange`]: a validated fetch request
//! - [`RawSeriesTable`]: rows exactly as the service returned them
//! - [`CleanSeriesTable`]: the canonical `date` / `values` table the chart binds to

use std::fmt;

use chrono::NaiveDate;

/// Name of the date column in a [`CleanSeriesTable`].
pub const DATE_COLUMN: &str = "date";
/// Name of the value column in a [`CleanSeriesTable`].
pub const VALUES_COLUMN: &str = "values";

/// Identifier of a series in the FRED catalog (e.g. `GDPC1`).
///
/// Always trimmed and non-empty. Whether the series exists is only known
/// once a fetch has been attempted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesId(String);

impl SeriesId {
    /// Trim `raw`; `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Requested observation window. Both ends inclusive.
///
/// No ordering is enforced: `start > end` is passed through and the service
/// decides what to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Series as returned by the service: date-indexed rows with a single,
/// service-named value column. `None` marks a missing observation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeriesTable {
    /// Name of the value column (the service uses the series identifier).
    pub column: String,
    /// Rows in service order.
    pub rows: Vec<(NaiveDate, Option<f64>)>,
}

impl RawSeriesTable {
    pub fn new(column: impl Into<String>, rows: Vec<(NaiveDate, Option<f64>)>) -> Self {
        Self {
            column: column.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<CleanSeriesTable> for RawSeriesTable {
    fn from(table: CleanSeriesTable) -> Self {
        let rows = table
            .dates
            .into_iter()
            .zip(table.values.into_iter().map(Some))
            .collect();
        Self {
            column: VALUES_COLUMN.to_string(),
            rows,
        }
    }
}

/// Canonical two-column table: `date` and `values`, one row per observation,
/// no missing values, rows in service order.
///
/// Columns are stored separately (like a column data source) and always have
/// equal length; the fields are private so nothing can patch one column alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanSeriesTable {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl CleanSeriesTable {
    /// Build a table from complete rows.
    pub fn from_rows(rows: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let (dates, values) = rows.into_iter().unzip();
        Self { dates, values }
    }

    pub fn columns(&self) -> [&'static str; 2] {
        [DATE_COLUMN, VALUES_COLUMN]
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn row(&self, idx: usize) -> Option<(NaiveDate, f64)> {
        Some((*self.dates.get(idx)?, *self.values.get(idx)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// `(first, last)` date, in row order.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }

    /// `(min, max)` over finite values.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for &v in self.values.iter().filter(|v| v.is_finite()) {
            bounds = Some(match bounds {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        bounds
    }
}

/// Curated shortcuts offered by the preset selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    TenYearTreasury,
    Cpi,
    #[default]
    RealGdp,
    UnemploymentRate,
}

impl Preset {
    /// Presets in selector order (sorted by label).
    pub const ALL: [Preset; 4] = [
        Preset::TenYearTreasury,
        Preset::Cpi,
        Preset::RealGdp,
        Preset::UnemploymentRate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Preset::TenYearTreasury => "10 Year Treasury Rate",
            Preset::Cpi => "CPI",
            Preset::RealGdp => "Real GDP",
            Preset::UnemploymentRate => "Unemployment Rate",
        }
    }

    pub fn series_id(self) -> &'static str {
        match self {
            Preset::TenYearTreasury => "DGS10",
            Preset::Cpi => "CPIAUCSL",
            Preset::RealGdp => "GDPC1",
            Preset::UnemploymentRate => "UNRATE",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }

    pub fn next(self) -> Self {
        let idx = self.position();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = self.position();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn series_id_is_trimmed_and_non_empty() {
        assert_eq!(SeriesId::parse("  GDPC1\t").unwrap().as_str(), "GDPC1");
        assert!(SeriesId::parse("   ").is_none());
        assert!(SeriesId::parse("").is_none());
    }

    #[test]
    fn presets_are_sorted_by_label() {
        let labels: Vec<&str> = Preset::ALL.iter().map(|p| p.label()).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn preset_mapping_matches_catalog() {
        assert_eq!(Preset::from_label("Real GDP").unwrap().series_id(), "GDPC1");
        assert_eq!(Preset::from_label("Unemployment Rate").unwrap().series_id(), "UNRATE");
        assert_eq!(Preset::from_label("CPI").unwrap().series_id(), "CPIAUCSL");
        assert_eq!(Preset::from_label("10 Year Treasury Rate").unwrap().series_id(), "DGS10");
        assert!(Preset::from_label("GDP").is_none());
        assert_eq!(Preset::default(), Preset::RealGdp);
    }

    #[test]
    fn preset_cycling_wraps() {
        assert_eq!(Preset::UnemploymentRate.next(), Preset::TenYearTreasury);
        assert_eq!(Preset::TenYearTreasury.prev(), Preset::UnemploymentRate);
        assert_eq!(Preset::Cpi.next().prev(), Preset::Cpi);
    }

    #[test]
    fn clean_table_accessors() {
        let table = CleanSeriesTable::from_rows(vec![(d(2020, 1, 1), 3.0), (d(2020, 2, 1), -1.0)]);
        assert_eq!(table.columns(), ["date", "values"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.row(1), Some((d(2020, 2, 1), -1.0)));
        assert_eq!(table.row(2), None);
        assert_eq!(table.date_span(), Some((d(2020, 1, 1), d(2020, 2, 1))));
        assert_eq!(table.value_bounds(), Some((-1.0, 3.0)));
        assert!(CleanSeriesTable::default().value_bounds().is_none());
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::new(d(2020, 1, 1), d(2020, 12, 31));
        assert!(range.contains(d(2020, 1, 1)));
        assert!(range.contains(d(2020, 12, 31)));
        assert!(!range.contains(d(2021, 1, 1)));
    }
}

//! The chart's data source.

use chrono::NaiveDate;

use crate::domain::CleanSeriesTable;

/// Tooltip label shown next to the hovered `values` entry.
pub const TOOLTIP_LABEL: &str = "Value";

/// The single table the chart is bound to.
///
/// Contents only change through [`PlotState::replace`], which swaps the whole
/// table at once and bumps `revision` so the renderer knows to redraw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotState {
    table: CleanSeriesTable,
    revision: u64,
}

impl PlotState {
    pub fn new(table: CleanSeriesTable) -> Self {
        Self { table, revision: 0 }
    }

    pub fn table(&self) -> &CleanSeriesTable {
        &self.table
    }

    /// Incremented on every replace.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn replace(&mut self, table: CleanSeriesTable) {
        self.table = table;
        self.revision = self.revision.wrapping_add(1);
    }

    /// Hover text for row `idx`, e.g. `2016-07-01  Value: 16663.65`.
    pub fn tooltip(&self, idx: usize) -> Option<String> {
        let (date, value) = self.table.row(idx)?;
        Some(format_tooltip(date, value))
    }
}

fn format_tooltip(date: NaiveDate, value: f64) -> String {
    format!("{date}  {TOOLTIP_LABEL}: {value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(values: &[f64]) -> CleanSeriesTable {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        CleanSeriesTable::from_rows(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + chrono::Days::new(i as u64), *v)),
        )
    }

    #[test]
    fn replace_swaps_table_and_bumps_revision() {
        let mut plot = PlotState::new(table(&[1.0, 2.0, 3.0]));
        assert_eq!(plot.revision(), 0);

        plot.replace(table(&[9.0]));
        assert_eq!(plot.revision(), 1);
        assert_eq!(plot.table().values(), &[9.0]);
        assert_eq!(plot.table().len(), 1);
    }

    #[test]
    fn tooltip_uses_value_label() {
        let plot = PlotState::new(table(&[3.5]));
        assert_eq!(plot.tooltip(0).unwrap(), "2020-01-01  Value: 3.5");
        assert!(plot.tooltip(1).is_none());
    }
}

//! Plotters-powered time-series line chart widget for Ratatui.
//!
//! Dates are plotted as day numbers (days since 0001-01-01) so the chart can
//! use a plain `f64` cartesian grid; tick formatters turn them back into
//! dates.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::CleanSeriesTable;

/// Render-ready series with precomputed bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub points: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl ChartSeries {
    /// Build the plotted points from the `date` / `values` columns.
    ///
    /// Returns `None` for an empty table. Degenerate ranges (one row, flat
    /// series) are widened so the chart always has a non-empty extent.
    pub fn from_table(table: &CleanSeriesTable) -> Option<Self> {
        if table.is_empty() {
            return None;
        }

        let points: Vec<(f64, f64)> = table
            .iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(d, v)| (date_to_x(d), v))
            .collect();

        let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, _) in &points {
            x0 = x0.min(x);
            x1 = x1.max(x);
        }
        if !x0.is_finite() || !x1.is_finite() || x1 <= x0 {
            let mid = if x0.is_finite() { x0 } else { 0.0 };
            x0 = mid - 15.0;
            x1 = mid + 15.0;
        }

        let (mut y_min, mut y_max) = table.value_bounds().unwrap_or((0.0, 1.0));
        if y_max <= y_min {
            y_min -= 0.5;
            y_max += 0.5;
        }
        let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

        Some(Self {
            points,
            x_bounds: [x0, x1],
            y_bounds: [y_min - pad, y_max + pad],
        })
    }
}

pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// A lightweight, render-only chart description.
pub struct SeriesChart<'a> {
    pub series: &'a ChartSeries,
    /// Hovered point, drawn as a highlight.
    pub hover: Option<(f64, f64)>,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for SeriesChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.series.x_bounds;
        let [y0, y1] = self.series.y_bounds;

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255); // cyan
            let hover_color = RGBColor(255, 255, 0); // yellow

            chart.draw_series(LineSeries::new(self.series.points.iter().copied(), &line_color))?;

            // `Circle` radii are mis-scaled by the ratatui backend; a pixel
            // marker renders cleanly.
            if let Some((x, y)) = self.hover {
                chart.draw_series(std::iter::once(Pixel::new((x, y), hover_color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_axis_round_trips_through_day_numbers() {
        let date = d(1951, 11, 1);
        assert_eq!(x_to_date(date_to_x(date)), Some(date));
        assert_eq!(x_to_date(date_to_x(date) + 0.4), Some(date));
    }

    #[test]
    fn empty_table_has_no_series() {
        assert!(ChartSeries::from_table(&CleanSeriesTable::default()).is_none());
    }

    #[test]
    fn bounds_cover_points_with_padding() {
        let table = CleanSeriesTable::from_rows(vec![(d(2020, 1, 1), 10.0), (d(2020, 12, 1), 20.0)]);
        let series = ChartSeries::from_table(&table).unwrap();
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.x_bounds, [date_to_x(d(2020, 1, 1)), date_to_x(d(2020, 12, 1))]);
        assert!((series.y_bounds[0] - 9.5).abs() < 1e-9);
        assert!((series.y_bounds[1] - 20.5).abs() < 1e-9);
    }

    #[test]
    fn single_flat_point_gets_a_non_empty_extent() {
        let table = CleanSeriesTable::from_rows(vec![(d(2020, 1, 1), 4.0)]);
        let series = ChartSeries::from_table(&table).unwrap();
        assert!(series.x_bounds[1] > series.x_bounds[0]);
        assert!(series.y_bounds[1] > series.y_bounds[0]);
        assert!(series.y_bounds[0] < 4.0 && series.y_bounds[1] > 4.0);
    }
}

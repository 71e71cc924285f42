//! Defect trend chart widget.
//!
//! Renders the per-minute defect counts as a line chart with time-labeled
//! axes.

use chrono::DateTime;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, Widget},
};

use crate::dashboard::TimeSeries;

/// Widget for rendering the defect trend.
pub struct TrendChart<'a> {
    series: &'a TimeSeries,
}

impl<'a> TrendChart<'a> {
    /// Creates a new trend chart.
    pub fn new(series: &'a TimeSeries) -> Self {
        Self { series }
    }

    /// Formats an epoch-seconds x value as a clock label.
    fn time_label(epoch: f64) -> String {
        DateTime::from_timestamp(epoch as i64, 0)
            .map(|ts| ts.format("%H:%M").to_string())
            .unwrap_or_default()
    }

    fn x_labels(bounds: [f64; 2]) -> Vec<Span<'a>> {
        let [lo, hi] = bounds;
        let mid = (lo + hi) / 2.0;
        vec![
            Span::raw(Self::time_label(lo)),
            Span::raw(Self::time_label(mid)),
            Span::raw(Self::time_label(hi)),
        ]
    }

    fn y_labels(bounds: [f64; 2]) -> Vec<Span<'a>> {
        let [lo, hi] = bounds;
        let mid = (lo + hi) / 2.0;
        vec![
            Span::raw(format!("{lo:.0}")),
            Span::raw(format!("{mid:.0}")),
            Span::raw(format!("{hi:.0}")),
        ]
    }
}

impl Widget for TrendChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let points = self.series.chart_points();
        let x_bounds = self.series.x_bounds();
        let y_bounds = self.series.y_bounds();

        let datasets = vec![Dataset::default()
            .name("defects/min")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&points)];

        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds(x_bounds)
                    .labels(Self::x_labels(x_bounds)),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds(y_bounds)
                    .labels(Self::y_labels(y_bounds)),
            );

        chart.render(area, buf);
    }
}

//! Time-series cast of the defect trend table.
//!
//! The trend panel's result arrives as strings like every other table; the
//! chart needs real timestamps and integer counts, so the first two columns
//! are parsed here. Parse failures name the offending row.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::query::ResultTable;

/// Timestamp formats the query service is known to emit for
/// minute-truncated values.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// One charted point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePoint {
    pub timestamp: NaiveDateTime,
    pub count: i64,
}

/// Errors casting a table to a time series.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SeriesError {
    #[error("expected at least 2 columns (timestamp, count), found {0}")]
    NotEnoughColumns(usize),

    #[error("row {row}: invalid timestamp '{value}'")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}: invalid count '{value}'")]
    BadCount { row: usize, value: String },
}

/// The defect trend as (timestamp, count) points, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSeries {
    points: Vec<TimePoint>,
}

impl TimeSeries {
    /// Casts a trend table: column 0 parsed as a timestamp, column 1 as an
    /// integer count.
    pub fn from_table(table: &ResultTable) -> Result<Self, SeriesError> {
        if table.column_count() < 2 && !table.is_empty() {
            return Err(SeriesError::NotEnoughColumns(table.column_count()));
        }

        let mut points = Vec::with_capacity(table.row_count());
        for (row, cells) in table.rows().iter().enumerate() {
            let raw_timestamp = cells[0].as_str();
            let timestamp =
                parse_timestamp(raw_timestamp).ok_or_else(|| SeriesError::BadTimestamp {
                    row,
                    value: raw_timestamp.to_string(),
                })?;

            let raw_count = cells[1].as_str();
            let count = raw_count
                .parse::<i64>()
                .map_err(|_| SeriesError::BadCount {
                    row,
                    value: raw_count.to_string(),
                })?;

            points.push(TimePoint { timestamp, count });
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points as (epoch seconds, count) pairs for chart datasets.
    pub fn chart_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.timestamp.and_utc().timestamp() as f64, p.count as f64))
            .collect()
    }

    /// X-axis bounds in epoch seconds. A single point gets a one-minute
    /// window around it so the chart still has width.
    pub fn x_bounds(&self) -> [f64; 2] {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for p in &self.points {
            let x = p.timestamp.and_utc().timestamp() as f64;
            min = min.min(x);
            max = max.max(x);
        }
        if self.points.is_empty() {
            [0.0, 1.0]
        } else if min == max {
            [min - 30.0, max + 30.0]
        } else {
            [min, max]
        }
    }

    /// Y-axis bounds from zero to the largest count (at least 1).
    pub fn y_bounds(&self) -> [f64; 2] {
        let max = self.points.iter().map(|p| p.count).max().unwrap_or(0);
        [0.0, max.max(1) as f64]
    }
}

/// Tries the known timestamp formats, then RFC 3339 with an offset.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.naive_utc())
}

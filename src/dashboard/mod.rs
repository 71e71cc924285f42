//! The monitoring dashboard: three fixed query panels refreshed together.
//!
//! A refresh runs the three query lifecycles strictly sequentially against
//! the query service. Failures are isolated per panel: one panel's error is
//! captured as its display text and never aborts the others.

mod panels;
mod series;

pub use panels::{panel_specs, PanelKind, PanelSpec};
pub use series::{SeriesError, TimePoint, TimeSeries};

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{DashboardConfig, ServiceSettings};
use crate::query::{QueryRunner, ResultTable};
use crate::service::{MockQueryService, QueryService, QuerySpec, ResultRow, ScriptedQuery};

/// Outcome of one panel's refresh.
#[derive(Debug, Clone)]
pub struct PanelData {
    pub kind: PanelKind,
    pub title: &'static str,

    /// The loaded table, or the error text to show in its place.
    pub result: Result<ResultTable, String>,
}

impl PanelData {
    /// Returns the table if the panel loaded.
    pub fn table(&self) -> Option<&ResultTable> {
        self.result.as_ref().ok()
    }
}

/// Result of one full dashboard refresh.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub panels: Vec<PanelData>,

    /// The defect trend cast for charting, or the error text (query failure
    /// or cast failure) to show in the chart area.
    pub series: Result<TimeSeries, String>,
}

impl DashboardData {
    /// Returns the panel of the given kind.
    pub fn panel(&self, kind: PanelKind) -> Option<&PanelData> {
        self.panels.iter().find(|p| p.kind == kind)
    }

    /// Returns true if no panel loaded.
    pub fn all_failed(&self) -> bool {
        self.panels.iter().all(|p| p.result.is_err())
    }
}

/// Runs dashboard refreshes against a query service.
pub struct Dashboard {
    service: Arc<dyn QueryService>,
    database: String,
    output_location: String,
    config: DashboardConfig,
}

impl Dashboard {
    /// Creates a dashboard over the given service and settings.
    pub fn new(
        service: Arc<dyn QueryService>,
        settings: &ServiceSettings,
        config: DashboardConfig,
    ) -> Self {
        Self {
            service,
            database: settings.database.clone(),
            output_location: settings.output_location.clone(),
            config,
        }
    }

    /// Runs all three panel queries, strictly in order, and collects the
    /// outcome of each.
    pub async fn refresh(&self) -> DashboardData {
        let runner = QueryRunner::new(self.service.as_ref(), self.config.poll_options());

        let mut panels = Vec::new();
        for spec in panel_specs(&self.config) {
            let query = QuerySpec::new(
                spec.sql.as_str(),
                self.database.as_str(),
                self.output_location.as_str(),
            );
            let result = runner.run(&query).await.map_err(|e| e.to_string());

            match &result {
                Ok(table) => {
                    info!(panel = spec.title, rows = table.row_count(), "panel loaded")
                }
                Err(msg) => warn!(panel = spec.title, error = %msg, "panel failed"),
            }

            panels.push(PanelData {
                kind: spec.kind,
                title: spec.title,
                result,
            });
        }

        let series = match panels.iter().find(|p| p.kind == PanelKind::DefectTrend) {
            Some(panel) => match &panel.result {
                Ok(table) => TimeSeries::from_table(table).map_err(|e| e.to_string()),
                Err(msg) => Err(msg.clone()),
            },
            None => Err("trend panel missing".to_string()),
        };

        DashboardData { panels, series }
    }
}

/// Builds a mock service preloaded with sample inspection data, for demo
/// runs and UI work without a live query service.
pub fn sample_service() -> MockQueryService {
    let inspections = ScriptedQuery::succeeded_with_rows(
        &["timestamp", "bottle_id", "camera_id", "defect_type", "confidence"],
        &[
            vec!["2026-08-04T10:02:11Z", "B21", "cam-2", "cap_misaligned", "0.97"],
            vec!["2026-08-04T10:01:58Z", "B20", "cam-1", "", ""],
            vec!["2026-08-04T10:01:42Z", "B19", "cam-2", "seal_crease", "0.81"],
            vec!["2026-08-04T10:01:30Z", "B18", "cam-1", "", ""],
            vec!["2026-08-04T10:00:55Z", "B17", "cam-3", "cap_misaligned", "0.93"],
        ],
    );

    let bottles = ScriptedQuery::succeeded_with_rows(
        &["bottle_id", "total_inspections", "total_defects"],
        &[
            vec!["B17", "12", "3"],
            vec!["B19", "11", "1"],
            vec!["B21", "9", "2"],
            vec!["B18", "8", "0"],
        ],
    );

    let trend = ScriptedQuery::new().page(vec![
        ResultRow::from_values(["minute", "defect_count"]),
        ResultRow::from_values(["2026-08-04 09:57:00.000", "0"]),
        ResultRow::from_values(["2026-08-04 09:58:00.000", "2"]),
        ResultRow::from_values(["2026-08-04 09:59:00.000", "1"]),
        ResultRow::from_values(["2026-08-04 10:00:00.000", "4"]),
        ResultRow::from_values(["2026-08-04 10:01:00.000", "2"]),
        ResultRow::from_values(["2026-08-04 10:02:00.000", "3"]),
    ]);

    // Enough scripted rounds to allow a few manual refreshes.
    let mut service = MockQueryService::new();
    for _ in 0..4 {
        service = service
            .queue(inspections.clone())
            .queue(bottles.clone())
            .queue(trend.clone());
    }
    service
}

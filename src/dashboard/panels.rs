//! The three fixed dashboard panels and their SQL.

use crate::config::DashboardConfig;

/// Row limit for the defect trend query. One point per minute, so this
/// covers several hours of history.
const TREND_ROW_LIMIT: u32 = 1000;

/// Identifies one dashboard panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// Latest raw inspection events.
    Inspections,
    /// Per-bottle inspection and defect totals.
    BottleSummary,
    /// Per-minute defect counts for the chart.
    DefectTrend,
}

/// One panel: a title and the SQL that backs it.
#[derive(Debug, Clone)]
pub struct PanelSpec {
    pub kind: PanelKind,
    pub title: &'static str,
    pub sql: String,
}

/// Builds the three panel specs over the configured log table.
pub fn panel_specs(config: &DashboardConfig) -> Vec<PanelSpec> {
    let table = &config.table;
    let limit = config.row_limit;

    vec![
        PanelSpec {
            kind: PanelKind::Inspections,
            title: "Inspections",
            sql: format!(
                "SELECT timestamp, bottle_id, camera_id, defect_type, confidence \
                 FROM {table} \
                 ORDER BY timestamp DESC \
                 LIMIT {limit}"
            ),
        },
        PanelSpec {
            kind: PanelKind::BottleSummary,
            title: "Bottle Summary",
            sql: format!(
                "SELECT bottle_id, \
                 COUNT(*) AS total_inspections, \
                 COUNT_IF(defect_type IS NOT NULL AND defect_type != '') AS total_defects \
                 FROM {table} \
                 GROUP BY bottle_id \
                 ORDER BY total_inspections DESC \
                 LIMIT {limit}"
            ),
        },
        PanelSpec {
            kind: PanelKind::DefectTrend,
            title: "Defects Over Time",
            sql: format!(
                "SELECT date_trunc('minute', from_iso8601_timestamp(timestamp)) AS minute, \
                 COUNT_IF(defect_type IS NOT NULL AND defect_type != '') AS defect_count \
                 FROM {table} \
                 GROUP BY 1 \
                 ORDER BY minute \
                 LIMIT {TREND_ROW_LIMIT}"
            ),
        },
    ]
}

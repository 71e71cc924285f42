//! Dashboard refresh integration tests.
//!
//! Exercises the three-panel refresh end to end against the mock service.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use capwatch::config::{DashboardConfig, ServiceSettings};
use capwatch::dashboard::{sample_service, Dashboard, PanelKind};
use capwatch::service::{MockQueryService, QueryService, ScriptedQuery};

fn settings() -> ServiceSettings {
    ServiceSettings {
        endpoint: "https://query.us-west-2.example.com".to_string(),
        region: "us-west-2".to_string(),
        database: "titos_cap_monitoring".to_string(),
        output_location: "s3://cisek-inspections-ml-data/athena-results/".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_sample_dashboard_loads_every_panel() {
    let dashboard = Dashboard::new(
        Arc::new(sample_service()),
        &settings(),
        DashboardConfig::default(),
    );

    let data = dashboard.refresh().await;

    let inspections = data.panel(PanelKind::Inspections).unwrap().table().unwrap();
    assert_eq!(
        inspections.columns(),
        &["timestamp", "bottle_id", "camera_id", "defect_type", "confidence"]
    );
    assert_eq!(inspections.row_count(), 5);

    let bottles = data.panel(PanelKind::BottleSummary).unwrap().table().unwrap();
    assert_eq!(bottles.cell(0, 0), Some("B17"));

    let series = data.series.unwrap();
    assert_eq!(series.len(), 6);
    assert_eq!(series.points().iter().map(|p| p.count).max(), Some(4));
}

#[tokio::test(start_paused = true)]
async fn test_panels_submit_in_fixed_order_with_shared_context() {
    let service = Arc::new(sample_service());
    let dashboard = Dashboard::new(
        Arc::clone(&service) as Arc<dyn QueryService>,
        &settings(),
        DashboardConfig::default(),
    );

    dashboard.refresh().await;

    let specs = service.submitted_specs();
    assert_eq!(specs.len(), 3);
    assert!(specs[0].sql.starts_with("SELECT timestamp"));
    assert!(specs[1].sql.starts_with("SELECT bottle_id"));
    assert!(specs[2].sql.starts_with("SELECT date_trunc"));
    for spec in &specs {
        assert_eq!(spec.database, "titos_cap_monitoring");
        assert_eq!(
            spec.output_location,
            "s3://cisek-inspections-ml-data/athena-results/"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_failed_panel_is_isolated() {
    let service = Arc::new(
        MockQueryService::new()
            .queue(ScriptedQuery::failed("TABLE_NOT_FOUND: parsed_logs"))
            .queue(ScriptedQuery::succeeded_with_rows(
                &["bottle_id", "total_inspections", "total_defects"],
                &[vec!["B17", "12", "3"]],
            ))
            .queue(ScriptedQuery::succeeded_with_rows(
                &["minute", "defect_count"],
                &[vec!["2026-08-04 10:00:00.000", "4"]],
            )),
    );
    let dashboard = Dashboard::new(service, &settings(), DashboardConfig::default());

    let data = dashboard.refresh().await;

    let failed = data.panel(PanelKind::Inspections).unwrap();
    assert!(failed.result.as_ref().unwrap_err().contains("TABLE_NOT_FOUND"));

    // The later panels still ran and loaded.
    assert!(data.panel(PanelKind::BottleSummary).unwrap().result.is_ok());
    assert!(data.panel(PanelKind::DefectTrend).unwrap().result.is_ok());
    assert_eq!(data.series.unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_row_limit_flows_into_sql() {
    let service = Arc::new(sample_service());
    let config = DashboardConfig {
        row_limit: 10,
        ..Default::default()
    };
    let dashboard = Dashboard::new(
        Arc::clone(&service) as Arc<dyn QueryService>,
        &settings(),
        config,
    );

    dashboard.refresh().await;

    let specs = service.submitted_specs();
    assert!(specs[0].sql.ends_with("LIMIT 10"));
    assert!(specs[1].sql.ends_with("LIMIT 10"));
}

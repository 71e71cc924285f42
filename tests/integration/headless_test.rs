//! Headless mode integration tests.

use std::sync::Arc;

use capwatch::config::{DashboardConfig, ServiceSettings};
use capwatch::dashboard::{sample_service, Dashboard};
use capwatch::headless;
use capwatch::service::FailingQueryService;

fn settings() -> ServiceSettings {
    ServiceSettings {
        endpoint: "https://query.us-west-2.example.com".to_string(),
        region: "us-west-2".to_string(),
        database: "titos_cap_monitoring".to_string(),
        output_location: "s3://cisek-inspections-ml-data/athena-results/".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_headless_run_succeeds_with_sample_data() {
    let dashboard = Dashboard::new(
        Arc::new(sample_service()),
        &settings(),
        DashboardConfig::default(),
    );

    assert!(headless::run(&dashboard).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_headless_run_fails_when_every_panel_fails() {
    let dashboard = Dashboard::new(
        Arc::new(FailingQueryService::default()),
        &settings(),
        DashboardConfig::default(),
    );

    let err = headless::run(&dashboard).await.unwrap_err();
    assert!(err.to_string().contains("all dashboard panels failed"));
}

//! Configuration loading integration tests.

use pretty_assertions::assert_eq;
use std::io::Write;

use capwatch::config::Config;

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
[service]
endpoint = "https://query.us-west-2.example.com"
database = "titos_cap_monitoring"
output_location = "s3://cisek-inspections-ml-data/athena-results/"

[dashboard]
poll_interval_ms = 250
"#
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();

    assert_eq!(
        config.service.database.as_deref(),
        Some("titos_cap_monitoring")
    );
    assert_eq!(config.dashboard.poll_interval_ms, 250);
    // Unspecified values keep their defaults.
    assert_eq!(config.dashboard.table, "parsed_logs");
    assert_eq!(config.service.region, "us-west-2");
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from_file(&dir.path().join("nope.toml")).unwrap();

    assert_eq!(config.service.endpoint, None);
    assert_eq!(config.dashboard.row_limit, 100);
}

#[test]
fn test_invalid_toml_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[service\nendpoint = ").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

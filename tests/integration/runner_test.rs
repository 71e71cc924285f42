//! Query lifecycle integration tests.
//!
//! Drives the runner through the submit / poll / fetch protocol against the
//! scriptable mock service.

use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::time::Instant;

use capwatch::query::{PollOptions, QueryFailure, QueryRunner};
use capwatch::service::{
    MockQueryService, QuerySpec, QueryStatus, ResultCell, ResultRow, ScriptedQuery,
};

fn spec() -> QuerySpec {
    QuerySpec::new(
        "SELECT bottle_id FROM parsed_logs",
        "titos_cap_monitoring",
        "s3://cisek-inspections-ml-data/athena-results/",
    )
}

fn options() -> PollOptions {
    PollOptions {
        interval: Duration::from_secs(1),
        timeout: Some(Duration::from_secs(60)),
    }
}

#[tokio::test(start_paused = true)]
async fn test_three_polls_with_fixed_delay_and_stable_handle() {
    let service = MockQueryService::new().queue(ScriptedQuery::new().statuses([
        QueryStatus::Running,
        QueryStatus::Running,
        QueryStatus::Succeeded,
    ]));
    let runner = QueryRunner::new(&service, options());

    let started = Instant::now();
    let handle = runner.submit_and_wait(&spec()).await.unwrap();
    // Two sleeps separate the three polls.
    assert_eq!(started.elapsed(), Duration::from_secs(2));

    let polls = service.status_calls();
    assert_eq!(polls.len(), 3);
    assert!(polls.iter().all(|h| *h == handle));

    // The same handle flows into the fetch.
    runner.fetch(&handle).await.unwrap();
    let fetches = service.results_calls();
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].0, handle);
}

#[tokio::test(start_paused = true)]
async fn test_bottle_summary_row_shape() {
    let service = MockQueryService::new().queue(ScriptedQuery::succeeded_with_rows(
        &["bottle_id", "total_inspections", "total_defects"],
        &[vec!["B17", "12", "3"]],
    ));
    let runner = QueryRunner::new(&service, options());

    let table = runner.run(&spec()).await.unwrap();

    assert_eq!(
        table.columns(),
        &["bottle_id", "total_inspections", "total_defects"]
    );
    assert_eq!(table.rows(), &[vec!["B17", "12", "3"]]);
}

#[tokio::test(start_paused = true)]
async fn test_row_count_matches_data_rows() {
    let mut rows = vec![ResultRow::from_values(["timestamp", "bottle_id"])];
    for i in 0..42 {
        rows.push(ResultRow::from_values([
            format!("2026-08-04T10:{:02}:00Z", i % 60),
            format!("B{i}"),
        ]));
    }
    let service = MockQueryService::new().queue(ScriptedQuery::new().page(rows));
    let runner = QueryRunner::new(&service, options());

    let table = runner.run(&spec()).await.unwrap();

    assert_eq!(table.row_count(), 42);
    assert!(table
        .rows()
        .iter()
        .all(|row| row.len() == table.column_count()));
}

#[tokio::test(start_paused = true)]
async fn test_missing_cells_become_empty_strings() {
    let service = MockQueryService::new().queue(
        ScriptedQuery::new().page(vec![
            ResultRow::from_values(["bottle_id", "defect_type"]),
            ResultRow {
                cells: vec![ResultCell::text("B20"), ResultCell::empty()],
            },
        ]),
    );
    let runner = QueryRunner::new(&service, options());

    let table = runner.run(&spec()).await.unwrap();

    assert_eq!(table.cell(0, 0), Some("B20"));
    assert_eq!(table.cell(0, 1), Some(""));
}

#[tokio::test(start_paused = true)]
async fn test_failed_query_yields_no_table() {
    let service =
        MockQueryService::new().queue(ScriptedQuery::failed("HIVE_BAD_DATA: malformed row"));
    let runner = QueryRunner::new(&service, options());

    let err = runner.run(&spec()).await.unwrap_err();
    assert!(err.to_string().contains("HIVE_BAD_DATA"));

    // The lifecycle never reached a fetch.
    assert!(service.results_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_query_yields_no_table() {
    let service = MockQueryService::new()
        .queue(ScriptedQuery::new().statuses([QueryStatus::Running, QueryStatus::Cancelled]));
    let runner = QueryRunner::new(&service, options());

    let err = runner.run(&spec()).await.unwrap_err();
    assert!(matches!(err, QueryFailure::Cancelled));
    assert!(service.results_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_multi_page_results_concatenate_in_order() {
    let service = MockQueryService::new().queue(
        ScriptedQuery::new()
            .page(vec![
                ResultRow::from_values(["bottle_id"]),
                ResultRow::from_values(["B1"]),
                ResultRow::from_values(["B2"]),
            ])
            .page(vec![
                ResultRow::from_values(["B3"]),
                ResultRow::from_values(["B4"]),
            ])
            .page(vec![ResultRow::from_values(["B5"])]),
    );
    let runner = QueryRunner::new(&service, options());

    let table = runner.run(&spec()).await.unwrap();

    let bottles: Vec<&str> = table.rows().iter().map(|r| r[0].as_str()).collect();
    assert_eq!(bottles, vec!["B1", "B2", "B3", "B4", "B5"]);
    // One fetch per page.
    assert_eq!(service.results_calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_poll_disabled_by_timeout() {
    let service = MockQueryService::new()
        .queue(ScriptedQuery::new().statuses(std::iter::repeat(QueryStatus::Running).take(500)));
    let runner = QueryRunner::new(
        &service,
        PollOptions {
            interval: Duration::from_secs(1),
            timeout: Some(Duration::from_secs(10)),
        },
    );

    let err = runner.submit_and_wait(&spec()).await.unwrap_err();
    match err {
        QueryFailure::TimedOut { waited } => assert!(waited >= Duration::from_secs(10)),
        other => panic!("expected TimedOut, got {other:?}"),
    }
}

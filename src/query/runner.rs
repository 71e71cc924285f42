//! Query lifecycle driver.
//!
//! Drives one query through the submit / poll / fetch protocol against the
//! query service: submit, poll status with a fixed sleep between polls until
//! a terminal state, then page through the results of a succeeded query.

use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::debug;

use super::table::ResultTable;
use crate::service::{QueryHandle, QueryService, QuerySpec, QueryStatus, ServiceError};

/// Polling parameters for one query lifecycle.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Fixed delay between consecutive status polls.
    pub interval: Duration,

    /// Upper bound on total waiting. `None` polls without limit.
    pub timeout: Option<Duration>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Some(Duration::from_secs(300)),
        }
    }
}

/// Ways one query lifecycle can fail.
///
/// Success is only observable as a returned handle or table, so callers
/// cannot forget to check for failure.
#[derive(Error, Debug)]
pub enum QueryFailure {
    /// The submission itself was rejected.
    #[error("query submission failed: {0}")]
    Submission(#[source] ServiceError),

    /// A status poll or result fetch failed.
    #[error("query service call failed: {0}")]
    Service(#[source] ServiceError),

    /// The query reached the FAILED state.
    #[error("query failed: {}", .reason.as_deref().unwrap_or("no reason reported"))]
    Failed { reason: Option<String> },

    /// The query reached the CANCELLED state.
    #[error("query was cancelled")]
    Cancelled,

    /// The query did not reach a terminal state within the poll timeout.
    #[error("query did not finish within {waited:?}")]
    TimedOut { waited: Duration },
}

/// Runs query lifecycles against a query service.
pub struct QueryRunner<'a> {
    service: &'a dyn QueryService,
    options: PollOptions,
}

impl<'a> QueryRunner<'a> {
    /// Creates a runner with the given polling parameters.
    pub fn new(service: &'a dyn QueryService, options: PollOptions) -> Self {
        Self { service, options }
    }

    /// Submits the query and polls until it succeeds.
    ///
    /// Returns the handle of a succeeded query, ready for `fetch`. A query
    /// that terminates in FAILED or CANCELLED, or that outlives the poll
    /// timeout, is an error.
    pub async fn submit_and_wait(&self, spec: &QuerySpec) -> Result<QueryHandle, QueryFailure> {
        let handle = self
            .service
            .submit(spec)
            .await
            .map_err(QueryFailure::Submission)?;
        debug!(handle = %handle, "query submitted");

        let start = Instant::now();
        loop {
            let report = self
                .service
                .get_status(&handle)
                .await
                .map_err(QueryFailure::Service)?;

            match report.status {
                QueryStatus::Succeeded => {
                    debug!(handle = %handle, "query succeeded");
                    return Ok(handle);
                }
                QueryStatus::Failed => {
                    return Err(QueryFailure::Failed {
                        reason: report.state_reason,
                    });
                }
                QueryStatus::Cancelled => return Err(QueryFailure::Cancelled),
                QueryStatus::Running => {
                    let waited = start.elapsed();
                    if let Some(limit) = self.options.timeout {
                        if waited >= limit {
                            return Err(QueryFailure::TimedOut { waited });
                        }
                    }
                    sleep(self.options.interval).await;
                }
            }
        }
    }

    /// Fetches all result rows for a succeeded query.
    ///
    /// Follows continuation tokens until the last page, then builds the
    /// table (first row is the header, missing cells become empty strings).
    pub async fn fetch(&self, handle: &QueryHandle) -> Result<ResultTable, QueryFailure> {
        let mut wire_rows = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let page = self
                .service
                .get_results(handle, token.as_deref())
                .await
                .map_err(QueryFailure::Service)?;

            wire_rows.extend(page.rows);
            match page.next_page_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        debug!(handle = %handle, rows = wire_rows.len(), "results fetched");
        Ok(ResultTable::from_wire_rows(wire_rows))
    }

    /// Runs one full lifecycle: submit, wait, fetch.
    pub async fn run(&self, spec: &QuerySpec) -> Result<ResultTable, QueryFailure> {
        let handle = self.submit_and_wait(spec).await?;
        self.fetch(&handle).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{
        FailingQueryService, MockQueryService, ResultRow, ScriptedQuery, StatusReport,
    };

    fn spec() -> QuerySpec {
        QuerySpec::new(
            "SELECT 1",
            "titos_cap_monitoring",
            "s3://inspections/results/",
        )
    }

    fn options() -> PollOptions {
        PollOptions {
            interval: Duration::from_secs(1),
            timeout: Some(Duration::from_secs(30)),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_returns_table_on_success() {
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
    async fn test_polls_until_terminal_state() {
        let service = MockQueryService::new().queue(ScriptedQuery::new().statuses([
            QueryStatus::Running,
            QueryStatus::Running,
            QueryStatus::Succeeded,
        ]));
        let runner = QueryRunner::new(&service, options());

        let handle = runner.submit_and_wait(&spec()).await.unwrap();

        let polls = service.status_calls();
        assert_eq!(polls.len(), 3);
        assert!(polls.iter().all(|h| *h == handle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_state_is_an_error_with_reason() {
        let service =
            MockQueryService::new().queue(ScriptedQuery::failed("SYNTAX_ERROR at line 1"));
        let runner = QueryRunner::new(&service, options());

        let err = runner.submit_and_wait(&spec()).await.unwrap_err();
        match err {
            QueryFailure::Failed { reason } => {
                assert_eq!(reason.as_deref(), Some("SYNTAX_ERROR at line 1"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_state_is_an_error() {
        let service = MockQueryService::new().queue(
            ScriptedQuery::new().status_reports([StatusReport::new(QueryStatus::Cancelled)]),
        );
        let runner = QueryRunner::new(&service, options());

        let err = runner.submit_and_wait(&spec()).await.unwrap_err();
        assert!(matches!(err, QueryFailure::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_failure() {
        let service = FailingQueryService::new("access denied to workgroup");
        let runner = QueryRunner::new(&service, options());

        let err = runner.run(&spec()).await.unwrap_err();
        assert!(matches!(err, QueryFailure::Submission(_)));
        assert!(err.to_string().contains("access denied"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_bounds_the_poll_loop() {
        let service = MockQueryService::new().queue(
            ScriptedQuery::new()
                .statuses(std::iter::repeat(QueryStatus::Running).take(1000)),
        );
        let runner = QueryRunner::new(
            &service,
            PollOptions {
                interval: Duration::from_secs(1),
                timeout: Some(Duration::from_secs(5)),
            },
        );

        let err = runner.submit_and_wait(&spec()).await.unwrap_err();
        assert!(matches!(err, QueryFailure::TimedOut { .. }));
        // One initial poll plus one per elapsed second up to the bound.
        assert_eq!(service.status_calls().len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_follows_continuation_tokens() {
        let service = MockQueryService::new().queue(
            ScriptedQuery::new()
                .page(vec![
                    ResultRow::from_values(["minute", "defect_count"]),
                    ResultRow::from_values(["2026-08-04 10:00:00.000", "2"]),
                ])
                .page(vec![ResultRow::from_values(["2026-08-04 10:01:00.000", "5"])]),
        );
        let runner = QueryRunner::new(&service, options());

        let table = runner.run(&spec()).await.unwrap();
        assert_eq!(table.columns(), &["minute", "defect_count"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 1), Some("5"));

        let fetches = service.results_calls();
        assert_eq!(fetches.len(), 2);
        assert_eq!(fetches[0].1, None);
        assert_eq!(fetches[1].1.as_deref(), Some("page-1"));
    }
}

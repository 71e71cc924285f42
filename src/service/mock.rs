//! Mock query service for testing.
//!
//! Serves scripted status sequences and result pages, and records every
//! call so tests can assert on polling behavior.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use super::types::{
    QueryHandle, QuerySpec, QueryStatus, ResultPage, ResultRow, ServiceError, StatusReport,
};
use super::QueryService;

/// Scripted behavior for one submitted query.
#[derive(Debug, Clone, Default)]
pub struct ScriptedQuery {
    statuses: Vec<StatusReport>,
    pages: Vec<ResultPage>,
}

impl ScriptedQuery {
    /// A query that reports `Succeeded` on the first poll and returns a
    /// single empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sequence of statuses reported by consecutive polls.
    ///
    /// Once the sequence is exhausted, further polls report `Succeeded`.
    pub fn statuses(mut self, statuses: impl IntoIterator<Item = QueryStatus>) -> Self {
        self.statuses = statuses.into_iter().map(StatusReport::new).collect();
        self
    }

    /// Sets the full status reports (with state reasons) for consecutive polls.
    pub fn status_reports(mut self, reports: impl IntoIterator<Item = StatusReport>) -> Self {
        self.statuses = reports.into_iter().collect();
        self
    }

    /// A query that reports `Failed` with the given reason on the first poll.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::new().status_reports([StatusReport::with_reason(QueryStatus::Failed, reason)])
    }

    /// Adds one result page. Continuation tokens are assigned automatically:
    /// every page except the last links to its successor.
    pub fn page(mut self, rows: Vec<ResultRow>) -> Self {
        self.pages.push(ResultPage {
            rows,
            next_page_token: None,
        });
        self
    }

    /// A query that succeeds immediately with a single page holding the
    /// given header and data rows.
    pub fn succeeded_with_rows<S: Into<String> + Clone>(
        header: &[S],
        rows: &[Vec<S>],
    ) -> Self {
        let mut page_rows = vec![ResultRow::from_values(header.iter().cloned())];
        for row in rows {
            page_rows.push(ResultRow::from_values(row.iter().cloned()));
        }
        Self::new().page(page_rows)
    }

    /// Finalizes the page chain for serving.
    fn into_state(self) -> QueryState {
        let mut pages = self.pages;
        if pages.is_empty() {
            pages.push(ResultPage::default());
        }
        let last = pages.len() - 1;
        for (i, page) in pages.iter_mut().enumerate() {
            if i < last {
                page.next_page_token = Some(format!("page-{}", i + 1));
            }
        }
        QueryState {
            statuses: self.statuses.into(),
            pages,
        }
    }
}

/// Live state of one submitted query inside the mock.
#[derive(Debug)]
struct QueryState {
    statuses: VecDeque<StatusReport>,
    pages: Vec<ResultPage>,
}

#[derive(Debug, Default)]
struct MockState {
    scripts: VecDeque<ScriptedQuery>,
    queries: HashMap<QueryHandle, QueryState>,
    submitted: Vec<QuerySpec>,
    status_calls: Vec<QueryHandle>,
    results_calls: Vec<(QueryHandle, Option<String>)>,
    next_id: usize,
}

/// A mock query service driven by scripted queries.
///
/// Submissions consume scripts in FIFO order; once the queue is empty,
/// submissions fall back to an immediately-succeeding query with one empty
/// page.
#[derive(Debug, Default)]
pub struct MockQueryService {
    state: Mutex<MockState>,
}

impl MockQueryService {
    /// Creates a mock with no scripted queries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a scripted query for the next submission.
    pub fn queue(self, script: ScriptedQuery) -> Self {
        self.state.lock().unwrap().scripts.push_back(script);
        self
    }

    /// Returns the specs submitted so far, in order.
    pub fn submitted_specs(&self) -> Vec<QuerySpec> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// Returns the handle passed to each status poll, in order.
    pub fn status_calls(&self) -> Vec<QueryHandle> {
        self.state.lock().unwrap().status_calls.clone()
    }

    /// Returns the (handle, page token) of each result fetch, in order.
    pub fn results_calls(&self) -> Vec<(QueryHandle, Option<String>)> {
        self.state.lock().unwrap().results_calls.clone()
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn submit(&self, spec: &QuerySpec) -> Result<QueryHandle, ServiceError> {
        let mut state = self.state.lock().unwrap();

        let script = state.scripts.pop_front().unwrap_or_default();
        let handle = QueryHandle(format!("query-{}", state.next_id));
        state.next_id += 1;

        state.submitted.push(spec.clone());
        state.queries.insert(handle.clone(), script.into_state());

        Ok(handle)
    }

    async fn get_status(&self, handle: &QueryHandle) -> Result<StatusReport, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.status_calls.push(handle.clone());

        let query = state
            .queries
            .get_mut(handle)
            .ok_or(ServiceError::NotFound)?;

        Ok(query
            .statuses
            .pop_front()
            .unwrap_or_else(|| StatusReport::new(QueryStatus::Succeeded)))
    }

    async fn get_results(
        &self,
        handle: &QueryHandle,
        page_token: Option<&str>,
    ) -> Result<ResultPage, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state
            .results_calls
            .push((handle.clone(), page_token.map(String::from)));

        let query = state.queries.get(handle).ok_or(ServiceError::NotFound)?;

        let index = match page_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| {
                    ServiceError::Protocol(format!("invalid page token: {token}"))
                })?,
        };

        query
            .pages
            .get(index)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }
}

/// A query service whose submissions always fail.
#[derive(Debug)]
pub struct FailingQueryService {
    message: String,
}

impl FailingQueryService {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingQueryService {
    fn default() -> Self {
        Self::new("service unavailable")
    }
}

#[async_trait]
impl QueryService for FailingQueryService {
    async fn submit(&self, _spec: &QuerySpec) -> Result<QueryHandle, ServiceError> {
        Err(ServiceError::Api(self.message.clone()))
    }

    async fn get_status(&self, _handle: &QueryHandle) -> Result<StatusReport, ServiceError> {
        Err(ServiceError::NotFound)
    }

    async fn get_results(
        &self,
        _handle: &QueryHandle,
        _page_token: Option<&str>,
    ) -> Result<ResultPage, ServiceError> {
        Err(ServiceError::NotFound)
    }
}

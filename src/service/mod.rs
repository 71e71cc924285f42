//! Query service abstraction for capwatch.
//!
//! Provides a trait-based interface to the external managed query service,
//! allowing the HTTP client and the test mock to be used interchangeably.

mod http;
mod mock;
mod types;

pub use http::HttpQueryService;
pub use mock::{FailingQueryService, MockQueryService, ScriptedQuery};
pub use types::{
    QueryHandle, QuerySpec, QueryStatus, QueryStatusResponse, ResultCell, ResultPage, ResultRow,
    ServiceError, StatusReport, SubmitQueryRequest, SubmitQueryResponse,
};

use async_trait::async_trait;

/// Trait defining the interface to the external query service.
///
/// One query lifecycle is: `submit` returns a handle, `get_status` is polled
/// with that handle until a terminal state, and `get_results` pages through
/// the rows of a succeeded query.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Submits a query for asynchronous execution.
    async fn submit(&self, spec: &QuerySpec) -> Result<QueryHandle, ServiceError>;

    /// Fetches the current status of a submitted query.
    async fn get_status(&self, handle: &QueryHandle) -> Result<StatusReport, ServiceError>;

    /// Fetches one page of results. `page_token` of `None` requests the
    /// first page; pass the previous page's `next_page_token` to continue.
    async fn get_results(
        &self,
        handle: &QueryHandle,
        page_token: Option<&str>,
    ) -> Result<ResultPage, ServiceError>;
}

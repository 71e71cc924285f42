//! Query service wire types.
//!
//! Defines the request/response structures exchanged with the query service
//! and the identifiers used to track one query lifecycle.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One query to submit: SQL text plus the execution context the service
/// needs (logical database and where to store results).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuerySpec {
    /// SQL text to execute.
    pub sql: String,

    /// Logical database the query runs against.
    pub database: String,

    /// Object-storage location where the service writes result data.
    pub output_location: String,
}

impl QuerySpec {
    /// Creates a new query spec.
    pub fn new(
        sql: impl Into<String>,
        database: impl Into<String>,
        output_location: impl Into<String>,
    ) -> Self {
        Self {
            sql: sql.into(),
            database: database.into(),
            output_location: output_location.into(),
        }
    }
}

/// Opaque identifier for a submitted query.
///
/// Returned by the service on submission; used for every status poll and
/// result fetch of that lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryHandle(pub String);

impl QueryHandle {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Execution state of a submitted query.
///
/// `Running` is the only non-terminal state; the other three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl QueryStatus {
    /// Parses a wire state string.
    ///
    /// The service reports queued queries with a distinct state; those have
    /// not reached a terminal state, so they map to `Running`.
    pub fn parse(state: &str) -> Option<Self> {
        match state {
            "QUEUED" | "RUNNING" => Some(Self::Running),
            "SUCCEEDED" => Some(Self::Succeeded),
            "FAILED" => Some(Self::Failed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further transition can occur from this state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Returns the state as the wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a query as reported by one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: QueryStatus,

    /// Human-readable reason accompanying a terminal failure, when the
    /// service provides one.
    pub state_reason: Option<String>,
}

impl StatusReport {
    pub fn new(status: QueryStatus) -> Self {
        Self {
            status,
            state_reason: None,
        }
    }

    pub fn with_reason(status: QueryStatus, reason: impl Into<String>) -> Self {
        Self {
            status,
            state_reason: Some(reason.into()),
        }
    }
}

/// Request body for `POST /v1/queries`.
#[derive(Debug, Serialize)]
pub struct SubmitQueryRequest<'a> {
    pub sql: &'a str,
    pub database: &'a str,
    pub output_location: &'a str,
}

/// Response body for `POST /v1/queries`.
#[derive(Debug, Deserialize)]
pub struct SubmitQueryResponse {
    pub query_id: String,
}

/// Response body for `GET /v1/queries/{id}`.
#[derive(Debug, Deserialize)]
pub struct QueryStatusResponse {
    pub state: String,
    #[serde(default)]
    pub state_reason: Option<String>,
}

/// One cell of a result row. A cell may carry no value at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultCell {
    #[serde(default)]
    pub value: Option<String>,
}

impl ResultCell {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn empty() -> Self {
        Self { value: None }
    }
}

/// One row of a result page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultRow {
    pub cells: Vec<ResultCell>,
}

impl ResultRow {
    /// Builds a row from string cells, every cell carrying a value.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: values.into_iter().map(ResultCell::text).collect(),
        }
    }
}

/// One page of result rows, as returned by
/// `GET /v1/queries/{id}/results`.
///
/// The first page of a result set starts with the header row. A page with
/// `next_page_token` set has more rows available.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultPage {
    pub rows: Vec<ResultRow>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Errors encountered talking to the query service.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("query not found")]
    NotFound,

    #[error("protocol error: {0}")]
    Protocol(String),
}

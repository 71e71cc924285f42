//! HTTP implementation of the query service client.
//!
//! Talks to the service's JSON API: submit a query, poll its status, fetch
//! result pages. The wire protocol is owned by the service; this client only
//! maps it onto the crate's types.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::types::{
    QueryHandle, QuerySpec, QueryStatus, QueryStatusResponse, ResultPage, ServiceError,
    StatusReport, SubmitQueryRequest, SubmitQueryResponse,
};
use super::QueryService;
use crate::config::ServiceSettings;

/// Query service client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpQueryService {
    base_url: String,
    region: String,
    http_client: Client,
}

impl HttpQueryService {
    /// Creates a new client for the given resolved connection values.
    pub fn new(settings: &ServiceSettings) -> Self {
        Self {
            base_url: settings.endpoint.trim_end_matches('/').to_string(),
            region: settings.region.clone(),
            http_client: Client::new(),
        }
    }

    /// Maps a non-success response to a `ServiceError`.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Api(format!("HTTP {status}: {body}")));
        }

        Ok(resp)
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    /// POST /v1/queries
    async fn submit(&self, spec: &QuerySpec) -> Result<QueryHandle, ServiceError> {
        let url = format!("{}/v1/queries", self.base_url);
        let request = SubmitQueryRequest {
            sql: &spec.sql,
            database: &spec.database,
            output_location: &spec.output_location,
        };

        let resp = self
            .http_client
            .post(&url)
            .header("x-region", &self.region)
            .json(&request)
            .send()
            .await?;

        let resp = Self::check_status(resp).await?;
        let body = resp.json::<SubmitQueryResponse>().await?;

        debug!(query_id = %body.query_id, "query submitted");
        Ok(QueryHandle(body.query_id))
    }

    /// GET /v1/queries/{id}
    async fn get_status(&self, handle: &QueryHandle) -> Result<StatusReport, ServiceError> {
        let url = format!("{}/v1/queries/{}", self.base_url, handle);

        let resp = self
            .http_client
            .get(&url)
            .header("x-region", &self.region)
            .send()
            .await?;

        let resp = Self::check_status(resp).await?;
        let body = resp.json::<QueryStatusResponse>().await?;

        let status = QueryStatus::parse(&body.state).ok_or_else(|| {
            ServiceError::Protocol(format!("unknown query state: {}", body.state))
        })?;

        Ok(StatusReport {
            status,
            state_reason: body.state_reason,
        })
    }

    /// GET /v1/queries/{id}/results
    async fn get_results(
        &self,
        handle: &QueryHandle,
        page_token: Option<&str>,
    ) -> Result<ResultPage, ServiceError> {
        let url = format!("{}/v1/queries/{}/results", self.base_url, handle);

        let mut request = self.http_client.get(&url).header("x-region", &self.region);
        if let Some(token) = page_token {
            request = request.query(&[("page_token", token)]);
        }

        let resp = request.send().await?;
        let resp = Self::check_status(resp).await?;
        let page = resp.json::<ResultPage>().await?;

        Ok(page)
    }
}

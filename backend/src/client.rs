//! HTTP client for the hosted backend

use crate::{
    auth::Session,
    config::BackendConfig,
    error::{BackendError, Result},
    query::{parse_content_range, QueryResult, TableQuery},
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Client for tables, auth and object storage of one backend project
///
/// Cloning is cheap; clones share the HTTP connection pool and the
/// current session.
#[derive(Clone)]
pub struct BackendClient {
    pub(crate) http: Client,
    pub(crate) config: Arc<BackendConfig>,
    pub(crate) session: Arc<RwLock<Option<Session>>>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("url", &self.config.url.as_str())
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a client for the configured project
    ///
    /// # Errors
    ///
    /// Returns `BackendError::RequestFailed` if the HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            config: Arc::new(config),
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Create a client from `TICKETDOCK_BACKEND_URL` / `TICKETDOCK_ANON_KEY`
    ///
    /// # Errors
    ///
    /// Returns `BackendError::MissingConfig` if either variable is unset.
    pub fn from_env() -> Result<Self> {
        Self::new(BackendConfig::from_env()?)
    }

    /// Connection settings
    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Run a select and decode the rows
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn select<T: DeserializeOwned>(&self, query: &TableQuery) -> Result<QueryResult<T>> {
        let url = self.config.endpoint(&format!("rest/v1/{}", query.table()))?;
        let mut request = self.http.get(url).query(&query.to_params());
        if query.wants_count() {
            request = request.header("Prefer", "count=exact");
        }

        let response = self.authorized(request).await.send().await.map_err(request_failed)?;
        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);
        let rows = decode::<Vec<T>>(response).await?;

        tracing::debug!(table = query.table(), rows = rows.len(), ?total, "select");
        Ok(QueryResult { rows, total })
    }

    /// Insert one row and return it as stored
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures,
    /// and `BackendError::EmptyInsert` if the backend echoes no row.
    pub async fn insert<B, T>(&self, table: &str, row: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(&format!("rest/v1/{table}"))?;
        let request = self
            .http
            .post(url)
            .header("Prefer", "return=representation")
            .json(row);

        let response = self.authorized(request).await.send().await.map_err(request_failed)?;
        let mut rows = decode::<Vec<T>>(response).await?;
        if rows.is_empty() {
            return Err(BackendError::EmptyInsert {
                table: table.to_string(),
            });
        }
        tracing::debug!(table, "insert");
        Ok(rows.swap_remove(0))
    }

    /// Attach the project key and the bearer token of the current session
    /// (falling back to the project key)
    pub(crate) async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .session
            .read()
            .await
            .as_ref()
            .map_or_else(|| self.config.anon_key.clone(), |s| s.access_token.clone());

        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
    }
}

pub(crate) fn request_failed(error: reqwest::Error) -> BackendError {
    BackendError::RequestFailed(error.to_string())
}

/// Map the response status and decode a JSON body
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    match response.status() {
        status if status.is_success() => response
            .json::<T>()
            .await
            .map_err(|e| BackendError::ResponseParseFailed(e.to_string())),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::Unauthorized(error_message(&body)))
        },
        status => {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::ApiError {
                status: status.as_u16(),
                message: error_message(&body),
            })
        },
    }
}

/// Pull a human-readable message out of an error body
///
/// The table, auth and storage services use different field names.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string())
}

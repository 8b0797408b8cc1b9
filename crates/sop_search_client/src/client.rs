//! HTTP client: one `POST /search` per query, JSON in and out.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::messages::{QueryRequest, SearchResponse};

/// Path of the search endpoint, relative to the server base URL.
pub const SEARCH_PATH: &str = "/search";

/// Transport or decoding failure. Backend-reported errors are not `ClientError`s;
/// they arrive as `SearchResponse::error`.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Parse(e.to_string())
    }
}

/// Anything that can answer a search request.
pub trait SearchBackend {
    fn search(
        &self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<SearchResponse, ClientError>> + Send;
}

/// Search client bound to one server.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: reqwest::Url,
}

impl Client {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:5000`. Without a
    /// timeout the transport default applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let base = reqwest::Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        let endpoint = base
            .join(SEARCH_PATH)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Send one query. The body is decoded whatever the HTTP status, since the
    /// server reports rejected queries as `{"error": ...}` with 4xx/5xx codes.
    pub async fn search(&self, request: &QueryRequest) -> Result<SearchResponse, ClientError> {
        let response = self.http.post(self.endpoint.clone()).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(%status, bytes = body.len(), "search response received");
        let parsed: SearchResponse = serde_json::from_slice(&body)?;
        Ok(parsed)
    }
}

impl SearchBackend for Client {
    fn search(
        &self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<SearchResponse, ClientError>> + Send {
        Client::search(self, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_search_path() {
        let client = Client::new("http://127.0.0.1:5000", None).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:5000/search");
    }

    #[test]
    fn rejects_garbage_url() {
        let err = Client::new("not a url", None).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }
}

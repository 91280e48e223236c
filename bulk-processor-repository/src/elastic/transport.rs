//! HTTP transport seam shared by all backend versions.
//!
//! The version adapters only need two calls from the cluster: posting a bulk
//! body and reading the root info document. [`OpenSearchTransport`] provides
//! them on top of the `opensearch` client; tests plug in their own
//! [`Transport`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    http::{
        headers::{HeaderMap, HeaderValue, CONTENT_TYPE},
        transport::{SingleNodeConnectionPool, TransportBuilder},
        Method,
    },
    OpenSearch,
};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::ElasticConfig;
use crate::errors::ClientError;

/// Raw HTTP response: status and body text.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Errors raised before a response was received.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The cluster could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The HTTP client failed to send the request or read the response.
    #[error("Request error: {0}")]
    Request(#[source] Arc<opensearch::Error>),
}

impl TransportError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }
}

impl From<opensearch::Error> for TransportError {
    fn from(err: opensearch::Error) -> Self {
        Self::Request(Arc::new(err))
    }
}

/// Minimal HTTP surface the version adapters need from a cluster.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST an NDJSON body to `/_bulk`.
    async fn bulk(&self, body: String) -> Result<TransportResponse, TransportError>;

    /// GET `/`.
    async fn info(&self) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by the `opensearch` HTTP client.
///
/// The bulk and root endpoints are wire compatible across Elasticsearch 6.x,
/// 7.x and OpenSearch, so one client serves every version adapter.
pub struct OpenSearchTransport {
    client: OpenSearch,
    timeout: Option<Duration>,
}

impl OpenSearchTransport {
    /// Build a single-node transport for the configured URL.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchTransport)` - A transport ready to send requests
    /// * `Err(ClientError)` - If the URL is invalid or the client cannot be built
    pub fn new(config: &ElasticConfig) -> Result<Self, ClientError> {
        let parsed_url = Url::parse(&config.url)
            .map_err(|e| ClientError::config(format!("invalid url {:?}: {}", config.url, e)))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some((username, password)) = config.basic_auth() {
            builder = builder.auth(Credentials::Basic(username, password));
        }
        let transport = builder
            .build()
            .map_err(|e| ClientError::connection(e.to_string()))?;

        info!(url = %config.url, "Created bulk transport");

        Ok(Self {
            client: OpenSearch::new(transport),
            timeout: config.request_timeout,
        })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<TransportResponse, TransportError> {
        let mut headers = HeaderMap::new();
        if body.is_some() {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-ndjson"),
            );
        }

        let response = self
            .client
            .send(method, path, headers, Option::<&()>::None, body, self.timeout)
            .await?;

        let status = response.status_code().as_u16();
        let body = response.text().await?;
        debug!(path, status, "Transport request completed");

        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl Transport for OpenSearchTransport {
    async fn bulk(&self, body: String) -> Result<TransportResponse, TransportError> {
        self.send(Method::Post, "/_bulk", Some(body)).await
    }

    async fn info(&self) -> Result<TransportResponse, TransportError> {
        self.send(Method::Get, "/", None).await
    }
}

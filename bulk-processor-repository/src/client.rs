//! Version-selecting client.
//!
//! `ElasticClient` is built once per cluster. It picks the version adapter
//! from the configuration or, when no version is configured, from the version
//! the cluster reports about itself.

use std::sync::Arc;

use bulk_processor_shared::BulkProcessorError;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::config::{ElasticConfig, ElasticVersion};
use crate::elastic::transport::{OpenSearchTransport, Transport};
use crate::elastic::v6::ElasticV6;
use crate::elastic::v7::ElasticV7;
use crate::errors::ClientError;
use crate::parameters::BulkProcessorParameters;
use crate::processor::ElasticBulkProcessor;

/// A client bound to one backend major version.
#[derive(Clone)]
pub enum ElasticClient {
    V6(ElasticV6),
    V7(ElasticV7),
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    version: InfoVersion,
}

#[derive(Debug, Deserialize)]
struct InfoVersion {
    number: String,
}

impl ElasticClient {
    /// Connect to the cluster described by `config`.
    ///
    /// # Returns
    ///
    /// * `Ok(ElasticClient)` - A client for the configured or detected version
    /// * `Err(ClientError)` - If the cluster is unreachable or runs an
    ///   unsupported version
    #[instrument(skip(config), fields(url = %config.url))]
    pub async fn connect(config: &ElasticConfig) -> Result<Self, ClientError> {
        let transport: Arc<dyn Transport> = Arc::new(OpenSearchTransport::new(config)?);
        let version = match config.version {
            Some(version) => version,
            None => detect_version(transport.as_ref()).await?,
        };

        info!(%version, "Connected to cluster");
        Ok(Self::with_transport(version, transport, config.doc_type.as_str()))
    }

    /// Build a client over an existing transport. `doc_type` is only used by
    /// 6.x clients.
    pub fn with_transport(
        version: ElasticVersion,
        transport: Arc<dyn Transport>,
        doc_type: impl Into<String>,
    ) -> Self {
        match version {
            ElasticVersion::V6 => Self::V6(ElasticV6::new(transport, doc_type)),
            ElasticVersion::V7 => Self::V7(ElasticV7::new(transport)),
        }
    }

    pub fn version(&self) -> ElasticVersion {
        match self {
            Self::V6(_) => ElasticVersion::V6,
            Self::V7(_) => ElasticVersion::V7,
        }
    }

    /// Build and start a bulk processor for this client's version.
    pub async fn run_bulk_processor(
        &self,
        parameters: BulkProcessorParameters,
    ) -> Result<ElasticBulkProcessor, BulkProcessorError> {
        match self {
            Self::V6(client) => client.run_bulk_processor(parameters).await.map(Into::into),
            Self::V7(client) => client.run_bulk_processor(parameters).await.map(Into::into),
        }
    }
}

/// Read the cluster's version from its root endpoint.
pub async fn detect_version(transport: &dyn Transport) -> Result<ElasticVersion, ClientError> {
    let response = transport
        .info()
        .await
        .map_err(|e| ClientError::connection(e.to_string()))?;
    if !response.is_success() {
        return Err(ClientError::connection(format!(
            "cluster info returned status {}",
            response.status
        )));
    }

    let info: InfoResponse = serde_json::from_str(&response.body)
        .map_err(|e| ClientError::connection(format!("invalid cluster info: {}", e)))?;
    info.version.number.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elastic::transport::mock::MockTransport;
    use crate::elastic::transport::{TransportError, TransportResponse};
    use crate::interfaces::GenericBulkProcessor;
    use bulk_processor_engine::StopBackoff;
    use bulk_processor_shared::GenericBulkableAddRequest;
    use serde_json::json;

    fn info(number: &str) -> MockTransport {
        MockTransport::with_info(Ok(TransportResponse::new(
            200,
            json!({"name": "node-1", "version": {"number": number}}).to_string(),
        )))
    }

    #[tokio::test]
    async fn test_detect_version() {
        assert_eq!(
            detect_version(&info("6.8.23")).await.unwrap(),
            ElasticVersion::V6
        );
        assert_eq!(
            detect_version(&info("7.17.0")).await.unwrap(),
            ElasticVersion::V7
        );
        assert!(matches!(
            detect_version(&info("8.11.1")).await,
            Err(ClientError::UnsupportedVersion(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let config = ElasticConfig::new("not a url").with_version(ElasticVersion::V7);

        assert!(matches!(
            ElasticClient::connect(&config).await,
            Err(ClientError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_detect_version_failures() {
        let unreachable = MockTransport::with_info(Err(TransportError::connection("refused")));
        assert!(matches!(
            detect_version(&unreachable).await,
            Err(ClientError::ConnectionError(_))
        ));

        let garbage = MockTransport::with_info(Ok(TransportResponse::new(200, "{}")));
        assert!(matches!(
            detect_version(&garbage).await,
            Err(ClientError::ConnectionError(_))
        ));
    }

    #[tokio::test]
    async fn test_v6_client_writes_types() {
        let transport = Arc::new(info("6.8.23"));
        let client = ElasticClient::with_transport(ElasticVersion::V6, transport.clone(), "event");
        assert_eq!(client.version(), ElasticVersion::V6);

        let processor = client
            .run_bulk_processor(
                BulkProcessorParameters::new("v6").with_backoff(Arc::new(StopBackoff)),
            )
            .await
            .unwrap();
        assert_eq!(processor.version(), ElasticVersion::V6);
        assert_eq!(processor.name(), "v6");

        processor
            .add(GenericBulkableAddRequest::index("docs", "1", json!({"a": 1})))
            .await
            .unwrap();
        processor.close().await.unwrap();

        let bodies = transport.bodies();
        assert_eq!(bodies.len(), 1);
        assert!(bodies[0].starts_with(r#"{"index":{"_index":"docs","_type":"event","_id":"1"}}"#));
    }

    #[tokio::test]
    async fn test_v7_client_is_typeless() {
        let transport = Arc::new(MockTransport::default());
        let client = ElasticClient::with_transport(ElasticVersion::V7, transport.clone(), "ignored");

        let processor = client
            .run_bulk_processor(BulkProcessorParameters::new("v7"))
            .await
            .unwrap();
        processor
            .add(GenericBulkableAddRequest::delete("docs", "1"))
            .await
            .unwrap();
        processor.flush().await.unwrap();

        assert_eq!(
            transport.bodies(),
            vec!["{\"delete\":{\"_index\":\"docs\",\"_id\":\"1\"}}\n".to_string()]
        );
        processor.close().await.unwrap();
    }
}

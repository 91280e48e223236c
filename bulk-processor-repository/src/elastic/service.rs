//! [`BulkService`] implementation over a [`Transport`].

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use bulk_processor_engine::{encode_body, BulkService, Bulkable};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::ElasticError;
use super::transport::Transport;

/// Commits batches of native requests `R` and decodes native responses `P`.
///
/// Each backend version instantiates this with its own request and response
/// types; the wire exchange is the same.
pub struct ElasticBulkService<R, P> {
    transport: Arc<dyn Transport>,
    _marker: PhantomData<fn() -> (R, P)>,
}

impl<R, P> ElasticBulkService<R, P> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            _marker: PhantomData,
        }
    }
}

impl<R, P> Clone for ElasticBulkService<R, P> {
    fn clone(&self) -> Self {
        Self::new(self.transport.clone())
    }
}

impl<R, P> fmt::Debug for ElasticBulkService<R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElasticBulkService").finish_non_exhaustive()
    }
}

#[async_trait]
impl<R, P> BulkService for ElasticBulkService<R, P>
where
    R: Bulkable,
    P: DeserializeOwned + fmt::Debug + Send + Sync + 'static,
{
    type Request = R;
    type Response = P;
    type Error = ElasticError;

    async fn commit(&self, requests: &[R]) -> Result<P, ElasticError> {
        let body = encode_body(requests).map_err(ElasticError::serialization)?;
        debug!(actions = requests.len(), bytes = body.len(), "Sending bulk request");

        let response = self.transport.bulk(body).await?;
        let response = ElasticError::check_response(response).map_err(|e| {
            warn!(status = ?e.status(), error = %e, "Bulk request rejected");
            e
        })?;

        serde_json::from_str(&response.body).map_err(ElasticError::decode)
    }

    fn is_retryable(&self, error: &ElasticError) -> bool {
        error.is_retryable()
    }

    async fn healthcheck(&self) -> Result<(), ElasticError> {
        let response = self.transport.info().await?;
        ElasticError::check_response(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elastic::error::ApiError;
    use crate::elastic::transport::mock::MockTransport;
    use crate::elastic::transport::{TransportError, TransportResponse};
    use crate::elastic::v7::{BulkIndexRequest, BulkResponse, BulkableRequest};
    use serde_json::json;

    type V7Service = ElasticBulkService<BulkableRequest, BulkResponse>;

    fn request(id: &str) -> BulkableRequest {
        BulkIndexRequest::new()
            .with_index("docs")
            .with_id(id)
            .with_doc(json!({"n": id}))
            .into()
    }

    #[tokio::test]
    async fn test_commit_sends_ndjson_and_decodes() {
        let transport = Arc::new(MockTransport::default());
        let service = V7Service::new(transport.clone());

        let response = service.commit(&[request("1"), request("2")]).await.unwrap();

        let bodies = transport.bodies();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].lines().count(), 4);
        assert!(bodies[0].ends_with('\n'));
        assert_eq!(response.items.map(|items| items.len()), Some(2));
    }

    #[tokio::test]
    async fn test_commit_maps_http_errors() {
        let transport = Arc::new(MockTransport::with_replies(vec![Ok(TransportResponse::new(
            429,
            r#"{"error":{"type":"es_rejected_execution_exception","reason":"queue full"}}"#,
        ))]));
        let service = V7Service::new(transport);

        let err = service.commit(&[request("1")]).await.unwrap_err();

        assert_eq!(err.status(), Some(429));
        assert!(service.is_retryable(&err));
    }

    #[tokio::test]
    async fn test_commit_maps_transport_and_decode_errors() {
        let transport = Arc::new(MockTransport::with_replies(vec![
            Err(TransportError::connection("refused")),
            Ok(TransportResponse::new(200, "not json")),
        ]));
        let service = V7Service::new(transport);

        let err = service.commit(&[request("1")]).await.unwrap_err();
        assert!(matches!(err, ElasticError::Transport(_)));

        let err = service.commit(&[request("1")]).await.unwrap_err();
        assert!(matches!(err, ElasticError::Decode(_)));
        assert!(!service.is_retryable(&err));
    }

    #[tokio::test]
    async fn test_healthcheck() {
        let healthy = V7Service::new(Arc::new(MockTransport::default()));
        assert!(healthy.healthcheck().await.is_ok());

        let unhealthy = V7Service::new(Arc::new(MockTransport::with_info(Ok(
            TransportResponse::new(401, r#"{"error":"unauthorized"}"#),
        ))));
        match unhealthy.healthcheck().await {
            Err(ElasticError::Api(ApiError { status, .. })) => assert_eq!(status, 401),
            other => panic!("unexpected result {:?}", other),
        }
    }
}

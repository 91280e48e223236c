//! Dependency initialization and wiring for the bulk indexer.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::BulkIndexerError;
use bulk_processor_engine::ExponentialBackoff;
use bulk_processor_repository::{BulkProcessorParameters, ElasticBulkProcessor, ElasticClient};
use bulk_processor_shared::{GenericBulkResponse, GenericBulkableRequest, GenericError};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The running bulk processor.
    pub processor: ElasticBulkProcessor,
}

impl Dependencies {
    /// Connect to the cluster and start a bulk processor.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(BulkIndexerError)` - If the cluster is unreachable or the
    ///   processor cannot be started
    pub async fn new(settings: &Settings) -> Result<Self, BulkIndexerError> {
        info!(
            url = %settings.elastic.url,
            version = ?settings.elastic.version,
            processor = %settings.processor_name,
            workers = settings.workers,
            bulk_actions = settings.bulk_actions,
            bulk_size = settings.bulk_size,
            flush_interval_ms = settings.flush_interval.as_millis() as u64,
            "Initializing dependencies"
        );

        let client = ElasticClient::connect(&settings.elastic).await?;
        info!(version = %client.version(), "Cluster connection verified");

        Self::with_client(&client, settings).await
    }

    /// Start a bulk processor on an already connected client.
    pub async fn with_client(
        client: &ElasticClient,
        settings: &Settings,
    ) -> Result<Self, BulkIndexerError> {
        let processor = client.run_bulk_processor(parameters(settings)).await?;

        Ok(Self { processor })
    }
}

/// Processor parameters with hooks that log every commit.
pub(crate) fn parameters(settings: &Settings) -> BulkProcessorParameters {
    BulkProcessorParameters::new(settings.processor_name.as_str())
        .with_num_of_workers(settings.workers)
        .with_bulk_actions(settings.bulk_actions)
        .with_bulk_size(settings.bulk_size)
        .with_flush_interval(settings.flush_interval)
        .with_backoff(Arc::new(ExponentialBackoff::default()))
        .with_before_func(|execution_id: i64, requests: &[GenericBulkableRequest]| {
            debug!(execution_id, actions = requests.len(), "Committing batch");
        })
        .with_after_func(log_commit)
}

fn log_commit(
    execution_id: i64,
    requests: &[GenericBulkableRequest],
    response: &GenericBulkResponse,
    err: Option<&GenericError>,
) {
    if let Some(e) = err {
        error!(
            execution_id,
            actions = requests.len(),
            status = e.status,
            error = %e,
            "Batch commit failed"
        );
        return;
    }

    let failed = response.failed_count();
    if failed > 0 {
        for item in response.item_results().filter(|item| !item.is_success()) {
            warn!(
                execution_id,
                index = %item.index,
                id = %item.id,
                status = item.status,
                reason = item.error.as_ref().map(|e| e.reason.as_str()).unwrap_or_default(),
                "Bulk item failed"
            );
        }
    }

    info!(
        execution_id,
        actions = requests.len(),
        failed,
        took_ms = response.took.as_millis() as u64,
        "Batch committed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bulk_processor_repository::elastic::{Transport, TransportError, TransportResponse};
    use bulk_processor_repository::ElasticVersion;
    use bulk_processor_shared::BulkProcessorError;
    use std::time::Duration;

    /// Cluster that answers every request with the same status.
    struct FixedStatusTransport(u16);

    #[async_trait]
    impl Transport for FixedStatusTransport {
        async fn bulk(&self, _body: String) -> Result<TransportResponse, TransportError> {
            Ok(TransportResponse::new(self.0, r#"{"took":1,"errors":false,"items":[]}"#))
        }

        async fn info(&self) -> Result<TransportResponse, TransportError> {
            Ok(TransportResponse::new(
                self.0,
                r#"{"error":"cluster unavailable","status":503}"#,
            ))
        }
    }

    fn default_settings() -> Settings {
        Settings::from_lookup(|_| None).unwrap()
    }

    #[tokio::test]
    async fn test_startup_failure_keeps_backend_status() {
        let client = ElasticClient::with_transport(
            ElasticVersion::V7,
            Arc::new(FixedStatusTransport(503)),
            "_doc",
        );

        let result = Dependencies::with_client(&client, &default_settings()).await;

        match result {
            Err(BulkIndexerError::ProcessorError(BulkProcessorError::Backend(e))) => {
                assert_eq!(e.status, 503)
            }
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_parameters_follow_settings() {
        let settings = Settings::from_lookup(|key| match key {
            "BULK_WORKERS" => Some("3".to_string()),
            "BULK_ACTIONS" => Some("50".to_string()),
            "BULK_FLUSH_INTERVAL_MS" => Some("250".to_string()),
            _ => None,
        })
        .unwrap();

        let parameters = parameters(&settings);

        assert_eq!(parameters.name, "bulk-processor");
        assert_eq!(parameters.num_of_workers, 3);
        assert_eq!(parameters.bulk_actions, 50);
        assert_eq!(parameters.flush_interval, Duration::from_millis(250));
        assert!(parameters.before_func.is_some());
        assert!(parameters.after_func.is_some());
    }
}

//! Elasticsearch 6.x support.

mod convert;
mod request;

use std::sync::Arc;

use bulk_processor_shared::BulkProcessorError;

pub use convert::V6Adapter;
pub use request::{BulkDeleteRequest, BulkIndexRequest, BulkableRequest, DEFAULT_DOC_TYPE};
pub use super::response::{BulkResponse, BulkResponseItem};

use super::service::ElasticBulkService;
use super::transport::Transport;
use crate::adapter::{run_bulk_processor, VersionedBulkProcessor};
use crate::parameters::BulkProcessorParameters;

pub type V6BulkService = ElasticBulkService<BulkableRequest, BulkResponse>;
pub type V6BulkProcessor = VersionedBulkProcessor<V6Adapter>;

/// Client for a 6.x cluster.
#[derive(Clone)]
pub struct ElasticV6 {
    transport: Arc<dyn Transport>,
    doc_type: String,
}

impl ElasticV6 {
    pub fn new(transport: Arc<dyn Transport>, doc_type: impl Into<String>) -> Self {
        Self {
            transport,
            doc_type: doc_type.into(),
        }
    }

    /// Build and start a bulk processor against this cluster.
    pub async fn run_bulk_processor(
        &self,
        parameters: BulkProcessorParameters,
    ) -> Result<V6BulkProcessor, BulkProcessorError> {
        run_bulk_processor(
            V6Adapter::new(self.doc_type.as_str()),
            V6BulkService::new(self.transport.clone()),
            parameters,
        )
        .await
    }
}

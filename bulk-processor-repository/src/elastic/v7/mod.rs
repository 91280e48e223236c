//! Elasticsearch 7.x support.

mod convert;
mod request;

use std::sync::Arc;

use bulk_processor_shared::BulkProcessorError;

pub use convert::V7Adapter;
pub use request::{BulkDeleteRequest, BulkIndexRequest, BulkableRequest};
pub use super::response::{BulkResponse, BulkResponseItem};

use super::service::ElasticBulkService;
use super::transport::Transport;
use crate::adapter::{run_bulk_processor, VersionedBulkProcessor};
use crate::parameters::BulkProcessorParameters;

pub type V7BulkService = ElasticBulkService<BulkableRequest, BulkResponse>;
pub type V7BulkProcessor = VersionedBulkProcessor<V7Adapter>;

/// Client for a 7.x cluster.
#[derive(Clone)]
pub struct ElasticV7 {
    transport: Arc<dyn Transport>,
}

impl ElasticV7 {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Build and start a bulk processor against this cluster.
    pub async fn run_bulk_processor(
        &self,
        parameters: BulkProcessorParameters,
    ) -> Result<V7BulkProcessor, BulkProcessorError> {
        run_bulk_processor(
            V7Adapter,
            V7BulkService::new(self.transport.clone()),
            parameters,
        )
        .await
    }
}

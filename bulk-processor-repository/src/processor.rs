//! Bulk processor facade over every supported backend version.

use async_trait::async_trait;
use bulk_processor_shared::{BulkProcessorError, GenericBulkableAddRequest};

use crate::config::ElasticVersion;
use crate::elastic::v6::V6BulkProcessor;
use crate::elastic::v7::V7BulkProcessor;
use crate::interfaces::GenericBulkProcessor;

/// A bulk processor for whichever version the client was built for.
///
/// The variant is fixed when the processor is built; every call forwards to
/// it unchanged.
#[derive(Debug)]
pub enum ElasticBulkProcessor {
    V6(V6BulkProcessor),
    V7(V7BulkProcessor),
}

impl ElasticBulkProcessor {
    pub fn version(&self) -> ElasticVersion {
        match self {
            Self::V6(_) => ElasticVersion::V6,
            Self::V7(_) => ElasticVersion::V7,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::V6(processor) => processor.name(),
            Self::V7(processor) => processor.name(),
        }
    }
}

impl From<V6BulkProcessor> for ElasticBulkProcessor {
    fn from(processor: V6BulkProcessor) -> Self {
        Self::V6(processor)
    }
}

impl From<V7BulkProcessor> for ElasticBulkProcessor {
    fn from(processor: V7BulkProcessor) -> Self {
        Self::V7(processor)
    }
}

#[async_trait]
impl GenericBulkProcessor for ElasticBulkProcessor {
    async fn add(&self, request: GenericBulkableAddRequest) -> Result<(), BulkProcessorError> {
        match self {
            Self::V6(processor) => processor.add(request).await,
            Self::V7(processor) => processor.add(request).await,
        }
    }

    async fn flush(&self) -> Result<(), BulkProcessorError> {
        match self {
            Self::V6(processor) => processor.flush().await,
            Self::V7(processor) => processor.flush().await,
        }
    }

    async fn start(&self) -> Result<(), BulkProcessorError> {
        match self {
            Self::V6(processor) => processor.start().await,
            Self::V7(processor) => processor.start().await,
        }
    }

    async fn stop(&self) -> Result<(), BulkProcessorError> {
        match self {
            Self::V6(processor) => processor.stop().await,
            Self::V7(processor) => processor.stop().await,
        }
    }

    async fn close(&self) -> Result<(), BulkProcessorError> {
        match self {
            Self::V6(processor) => processor.close().await,
            Self::V7(processor) => processor.close().await,
        }
    }
}

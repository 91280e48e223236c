//! Bulk processor bound to one version adapter.

use std::fmt;

use async_trait::async_trait;
use bulk_processor_engine::{BulkProcessor, BulkProcessorService, EngineError};
use bulk_processor_shared::{BulkProcessorError, GenericBulkableAddRequest, GenericError};
use tracing::{debug, info};

use crate::bridge::{wrap_after, wrap_before, NativeError, VersionAdapter};
use crate::interfaces::GenericBulkProcessor;
use crate::parameters::BulkProcessorParameters;

/// A running batching engine that speaks the generic model.
///
/// Requests are translated by the adapter on `add`; everything else is
/// forwarded to the engine with its errors normalized.
pub struct VersionedBulkProcessor<A: VersionAdapter> {
    adapter: A,
    processor: BulkProcessor<A::Service>,
}

impl<A: VersionAdapter> VersionedBulkProcessor<A> {
    pub fn name(&self) -> &str {
        self.processor.name()
    }

    fn to_processor_error(&self, err: EngineError<NativeError<A>>) -> BulkProcessorError {
        match err {
            EngineError::InvalidConfig(msg) => BulkProcessorError::invalid_parameters(msg),
            EngineError::NotRunning(name) => BulkProcessorError::not_running(name),
            EngineError::Startup(e) | EngineError::Commit(e) => {
                BulkProcessorError::Backend(self.adapter.to_generic_error(&e))
            }
            gone @ EngineError::WorkerGone { .. } => {
                BulkProcessorError::Backend(GenericError::unknown(gone))
            }
        }
    }
}

/// Build the engine for `adapter`, wire the caller's hooks through the
/// callback bridge and start it.
///
/// `bulk_actions` and `bulk_size` of zero or less and a zero
/// `flush_interval` disable those triggers.
pub async fn run_bulk_processor<A: VersionAdapter>(
    adapter: A,
    service: A::Service,
    parameters: BulkProcessorParameters,
) -> Result<VersionedBulkProcessor<A>, BulkProcessorError> {
    let flush_interval = Some(parameters.flush_interval).filter(|interval| !interval.is_zero());

    let mut builder = BulkProcessorService::new(service)
        .name(parameters.name.as_str())
        .workers(parameters.num_of_workers)
        .bulk_actions(positive(parameters.bulk_actions))
        .bulk_size(positive(parameters.bulk_size))
        .flush_interval(flush_interval)
        .backoff(parameters.backoff.clone());

    if let Some(before) = parameters.before_func {
        builder = builder.before(wrap_before(adapter.clone(), before));
    }
    if let Some(after) = parameters.after_func {
        builder = builder.after(wrap_after(adapter.clone(), after));
    }

    let processor = builder.run().await.map_err(|e| match e {
        EngineError::InvalidConfig(msg) => BulkProcessorError::invalid_parameters(msg),
        EngineError::Startup(e) | EngineError::Commit(e) => {
            BulkProcessorError::Backend(adapter.to_generic_error(&e))
        }
        other => BulkProcessorError::Backend(GenericError::unknown(other)),
    })?;

    info!(
        name = %parameters.name,
        version = %adapter.version(),
        workers = parameters.num_of_workers,
        flush_interval_ms = ?flush_interval.map(|interval| interval.as_millis()),
        "Bulk processor running"
    );

    Ok(VersionedBulkProcessor { adapter, processor })
}

fn positive(limit: i64) -> Option<usize> {
    usize::try_from(limit).ok().filter(|limit| *limit > 0)
}

#[async_trait]
impl<A: VersionAdapter> GenericBulkProcessor for VersionedBulkProcessor<A> {
    async fn add(&self, request: GenericBulkableAddRequest) -> Result<(), BulkProcessorError> {
        request.validate()?;
        debug!(
            op_type = %request.request_type(),
            index = %request.index,
            id = %request.id,
            "Adding bulk request"
        );

        let native = self.adapter.to_native_request(request)?;
        self.processor
            .add(native)
            .await
            .map_err(|e| self.to_processor_error(e))
    }

    async fn flush(&self) -> Result<(), BulkProcessorError> {
        self.processor
            .flush()
            .await
            .map_err(|e| self.to_processor_error(e))
    }

    async fn start(&self) -> Result<(), BulkProcessorError> {
        self.processor
            .start()
            .await
            .map_err(|e| self.to_processor_error(e))
    }

    async fn stop(&self) -> Result<(), BulkProcessorError> {
        self.processor
            .stop()
            .await
            .map_err(|e| self.to_processor_error(e))
    }

    async fn close(&self) -> Result<(), BulkProcessorError> {
        self.processor
            .close()
            .await
            .map_err(|e| self.to_processor_error(e))
    }
}

impl<A: VersionAdapter + fmt::Debug> fmt::Debug for VersionedBulkProcessor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedBulkProcessor")
            .field("adapter", &self.adapter)
            .field("processor", &self.processor)
            .finish()
    }
}

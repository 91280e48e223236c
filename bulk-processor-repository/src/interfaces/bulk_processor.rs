//! Bulk processor trait definition.

use async_trait::async_trait;

use bulk_processor_shared::{BulkProcessorError, GenericBulkableAddRequest};

/// A running bulk processor.
///
/// Implementations must be `Send + Sync` so a single processor can be shared
/// across tasks; `add` may be called concurrently.
#[async_trait]
pub trait GenericBulkProcessor: Send + Sync {
    /// Queue a request for the next batch.
    ///
    /// Returns as soon as the request is queued; no I/O happens here. Fails
    /// with `UnsupportedRequest` if the request cannot be translated and with
    /// `NotRunning` after the processor was stopped.
    async fn add(&self, request: GenericBulkableAddRequest) -> Result<(), BulkProcessorError>;

    /// Commit everything queued so far and wait for the result.
    async fn flush(&self) -> Result<(), BulkProcessorError>;

    /// Start the processor again after a stop. No-op when already running.
    async fn start(&self) -> Result<(), BulkProcessorError>;

    /// Commit what is queued and stop the workers. Safe to call repeatedly.
    async fn stop(&self) -> Result<(), BulkProcessorError>;

    /// Same as `stop`.
    async fn close(&self) -> Result<(), BulkProcessorError>;
}

//! Error types for the batching engine.

use thiserror::Error;

/// Errors returned by [`BulkProcessor`](crate::BulkProcessor) operations.
///
/// `E` is the native error type of the underlying
/// [`BulkService`](crate::BulkService).
#[derive(Error, Debug, Clone)]
pub enum EngineError<E> {
    /// The processor configuration was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The processor is not started, or has been stopped.
    #[error("Bulk processor {0:?} is not running")]
    NotRunning(String),

    /// A worker task exited while the processor was running.
    #[error("Bulk processor {name:?} worker {worker} is gone")]
    WorkerGone { name: String, worker: usize },

    /// The service health check failed on start.
    #[error("Startup failed: {0}")]
    Startup(#[source] E),

    /// A bulk commit failed after exhausting retries.
    #[error("Commit failed: {0}")]
    Commit(#[source] E),
}

impl<E> EngineError<E> {
    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a not running error for the named processor.
    pub fn not_running(name: impl Into<String>) -> Self {
        Self::NotRunning(name.into())
    }

    /// Create a worker gone error.
    pub fn worker_gone(name: impl Into<String>, worker: usize) -> Self {
        Self::WorkerGone {
            name: name.into(),
            worker,
        }
    }
}

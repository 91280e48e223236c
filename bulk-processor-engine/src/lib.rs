//! # Bulk Processor Engine
//!
//! A batching engine for bulk-write APIs. Requests are queued by callers,
//! accumulated by a fixed pool of background workers and committed in
//! batches when a count, size or time threshold is reached, or on demand.
//!
//! The engine knows nothing about a particular backend. It is generic over a
//! [`BulkService`] that owns the native request, response and error types and
//! performs the actual commit.
//!
//! ## Lifecycle
//!
//! 1. Configure a [`BulkProcessorService`] and call `run` to get a started
//!    [`BulkProcessor`].
//! 2. Call `add` from any number of tasks.
//! 3. Call `flush` to force a commit, `stop`/`close` to drain and shut down.

pub mod backoff;
pub mod errors;
pub mod processor;
pub mod service;
mod worker;

pub use backoff::{Backoff, ConstantBackoff, ExponentialBackoff, StopBackoff};
pub use errors::EngineError;
pub use processor::{AfterFn, BeforeFn, BulkProcessor, BulkProcessorService};
pub use service::{encode_body, BulkService, Bulkable};

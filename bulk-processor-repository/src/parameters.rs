//! Bulk processor parameters.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bulk_processor_engine::{Backoff, ExponentialBackoff};
use bulk_processor_shared::{GenericBulkResponse, GenericBulkableRequest, GenericError};

/// Hook called with each batch right before it is committed.
pub type BeforeFunc = Arc<dyn Fn(i64, &[GenericBulkableRequest]) + Send + Sync>;

/// Hook called after each commit. The error is present only when the commit
/// failed; the response is zero-valued in that case.
pub type AfterFunc = Arc<
    dyn Fn(i64, &[GenericBulkableRequest], &GenericBulkResponse, Option<&GenericError>)
        + Send
        + Sync,
>;

/// Configuration of a bulk processor.
///
/// `bulk_actions` and `bulk_size` of zero or less disable the respective
/// flush trigger; a zero `flush_interval` disables periodic flushing.
#[derive(Clone)]
pub struct BulkProcessorParameters {
    pub name: String,
    pub num_of_workers: usize,
    pub bulk_actions: i64,
    /// Bytes.
    pub bulk_size: i64,
    pub flush_interval: Duration,
    pub backoff: Arc<dyn Backoff>,
    pub before_func: Option<BeforeFunc>,
    pub after_func: Option<AfterFunc>,
}

impl Default for BulkProcessorParameters {
    fn default() -> Self {
        Self {
            name: String::new(),
            num_of_workers: 1,
            bulk_actions: 1000,
            bulk_size: 5 << 20,
            flush_interval: Duration::ZERO,
            backoff: Arc::new(ExponentialBackoff::default()),
            before_func: None,
            after_func: None,
        }
    }
}

impl BulkProcessorParameters {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_num_of_workers(mut self, num_of_workers: usize) -> Self {
        self.num_of_workers = num_of_workers;
        self
    }

    pub fn with_bulk_actions(mut self, bulk_actions: i64) -> Self {
        self.bulk_actions = bulk_actions;
        self
    }

    pub fn with_bulk_size(mut self, bulk_size: i64) -> Self {
        self.bulk_size = bulk_size;
        self
    }

    pub fn with_flush_interval(mut self, flush_interval: Duration) -> Self {
        self.flush_interval = flush_interval;
        self
    }

    pub fn with_backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_before_func<F>(mut self, before: F) -> Self
    where
        F: Fn(i64, &[GenericBulkableRequest]) + Send + Sync + 'static,
    {
        self.before_func = Some(Arc::new(before));
        self
    }

    pub fn with_after_func<F>(mut self, after: F) -> Self
    where
        F: Fn(i64, &[GenericBulkableRequest], &GenericBulkResponse, Option<&GenericError>)
            + Send
            + Sync
            + 'static,
    {
        self.after_func = Some(Arc::new(after));
        self
    }
}

impl fmt::Debug for BulkProcessorParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkProcessorParameters")
            .field("name", &self.name)
            .field("num_of_workers", &self.num_of_workers)
            .field("bulk_actions", &self.bulk_actions)
            .field("bulk_size", &self.bulk_size)
            .field("flush_interval", &self.flush_interval)
            .field("backoff", &self.backoff)
            .field("before_func", &self.before_func.is_some())
            .field("after_func", &self.after_func.is_some())
            .finish()
    }
}

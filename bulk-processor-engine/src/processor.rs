//! Bulk processor builder and handle.

use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, RwLock};
use tracing::{error, info, instrument, warn};

use crate::backoff::{Backoff, ExponentialBackoff};
use crate::errors::EngineError;
use crate::service::BulkService;
use crate::worker::{BulkWorker, CommandSender, WorkerCommand, WorkerHandle};

/// Hook invoked on a worker right before a batch is committed.
pub type BeforeFn<R> = Arc<dyn Fn(i64, &[R]) + Send + Sync>;

/// Hook invoked on a worker after a batch was committed, successfully or not.
///
/// Exactly one of the response and the error is present.
pub type AfterFn<R, P, E> = Arc<dyn Fn(i64, &[R], Option<&P>, Option<&E>) + Send + Sync>;

/// Default maximum number of requests per batch.
const DEFAULT_BULK_ACTIONS: usize = 1000;

/// Default maximum batch size in bytes (5 MiB).
const DEFAULT_BULK_SIZE: usize = 5 << 20;

pub(crate) struct ProcessorConfig<S: BulkService> {
    pub(crate) name: String,
    pub(crate) workers: usize,
    pub(crate) bulk_actions: Option<usize>,
    pub(crate) bulk_size: Option<usize>,
    pub(crate) flush_interval: Option<Duration>,
    pub(crate) backoff: Arc<dyn Backoff>,
    pub(crate) before: Option<BeforeFn<S::Request>>,
    pub(crate) after: Option<AfterFn<S::Request, S::Response, S::Error>>,
}

/// Builder for a [`BulkProcessor`].
///
/// # Example
///
/// ```ignore
/// let processor = BulkProcessorService::new(service)
///     .name("visibility")
///     .workers(2)
///     .bulk_actions(Some(500))
///     .flush_interval(Some(Duration::from_secs(1)))
///     .run()
///     .await?;
/// ```
pub struct BulkProcessorService<S: BulkService> {
    service: S,
    config: ProcessorConfig<S>,
}

impl<S: BulkService> BulkProcessorService<S> {
    /// Create a builder with default settings: one worker, 1000 actions or
    /// 5 MiB per batch, no flush interval, exponential backoff.
    pub fn new(service: S) -> Self {
        Self {
            service,
            config: ProcessorConfig {
                name: String::new(),
                workers: 1,
                bulk_actions: Some(DEFAULT_BULK_ACTIONS),
                bulk_size: Some(DEFAULT_BULK_SIZE),
                flush_interval: None,
                backoff: Arc::new(ExponentialBackoff::default()),
                before: None,
                after: None,
            },
        }
    }

    /// Name used in logs and errors.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Number of background workers. Must be at least 1.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Commit once a worker holds this many requests. `None` disables the trigger.
    pub fn bulk_actions(mut self, bulk_actions: Option<usize>) -> Self {
        self.config.bulk_actions = bulk_actions;
        self
    }

    /// Commit once a worker holds this many bytes. `None` disables the trigger.
    pub fn bulk_size(mut self, bulk_size: Option<usize>) -> Self {
        self.config.bulk_size = bulk_size;
        self
    }

    /// Commit periodically. `None` disables the trigger.
    pub fn flush_interval(mut self, flush_interval: Option<Duration>) -> Self {
        self.config.flush_interval = flush_interval;
        self
    }

    pub fn backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.config.backoff = backoff;
        self
    }

    pub fn before(mut self, before: BeforeFn<S::Request>) -> Self {
        self.config.before = Some(before);
        self
    }

    pub fn after(mut self, after: AfterFn<S::Request, S::Response, S::Error>) -> Self {
        self.config.after = Some(after);
        self
    }

    /// Validate the configuration, then build and start the processor.
    pub async fn run(self) -> Result<BulkProcessor<S>, EngineError<S::Error>> {
        if self.config.workers == 0 {
            return Err(EngineError::invalid_config(
                "number of workers must be at least 1",
            ));
        }

        let processor = BulkProcessor {
            service: Arc::new(self.service),
            config: Arc::new(self.config),
            execution_id: Arc::new(AtomicI64::new(0)),
            next_worker: AtomicUsize::new(0),
            workers: RwLock::new(None),
        };
        processor.start().await?;

        Ok(processor)
    }
}

/// A running batching engine.
///
/// Requests added with [`add`](Self::add) are spread round-robin over the
/// workers. Each worker commits its own batches, so ordering is preserved per
/// worker only.
pub struct BulkProcessor<S: BulkService> {
    service: Arc<S>,
    config: Arc<ProcessorConfig<S>>,
    execution_id: Arc<AtomicI64>,
    next_worker: AtomicUsize,
    workers: RwLock<Option<Vec<WorkerHandle<S>>>>,
}

impl<S: BulkService> BulkProcessor<S> {
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Start the workers. Starting a running processor is a no-op.
    #[instrument(skip(self), fields(name = %self.config.name))]
    pub async fn start(&self) -> Result<(), EngineError<S::Error>> {
        let mut workers = self.workers.write().await;
        if workers.is_some() {
            return Ok(());
        }

        self.service
            .healthcheck()
            .await
            .map_err(EngineError::Startup)?;

        let handles = (0..self.config.workers)
            .map(|index| {
                BulkWorker::spawn(
                    index,
                    self.service.clone(),
                    self.config.clone(),
                    self.execution_id.clone(),
                )
            })
            .collect();
        *workers = Some(handles);

        info!(workers = self.config.workers, "Bulk processor started");
        Ok(())
    }

    /// Queue a request for the next batch of one of the workers.
    pub async fn add(&self, request: S::Request) -> Result<(), EngineError<S::Error>> {
        let (index, sender) = {
            let workers = self.workers.read().await;
            let workers = workers
                .as_ref()
                .ok_or_else(|| EngineError::not_running(&self.config.name))?;
            let index = self.next_worker.fetch_add(1, Ordering::Relaxed) % workers.len();
            (index, workers[index].sender.clone())
        };

        sender
            .send(WorkerCommand::Add(request))
            .await
            .map_err(|_| EngineError::worker_gone(&self.config.name, index))
    }

    /// Commit everything queued so far and wait for the commits to finish.
    ///
    /// Every worker is flushed even if one of them fails or is gone; the
    /// first error is returned.
    #[instrument(skip(self), fields(name = %self.config.name))]
    pub async fn flush(&self) -> Result<(), EngineError<S::Error>> {
        let senders: Vec<(usize, CommandSender<S>)> = {
            let workers = self.workers.read().await;
            let workers = workers
                .as_ref()
                .ok_or_else(|| EngineError::not_running(&self.config.name))?;
            workers
                .iter()
                .enumerate()
                .map(|(index, handle)| (index, handle.sender.clone()))
                .collect()
        };

        let mut result = Ok(());
        for (index, sender) in senders {
            let (ack_tx, ack_rx) = oneshot::channel();
            let outcome = match sender.send(WorkerCommand::Flush(ack_tx)).await {
                Ok(()) => match ack_rx.await {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(EngineError::Commit(e)),
                    Err(_) => Err(EngineError::worker_gone(&self.config.name, index)),
                },
                Err(_) => Err(EngineError::worker_gone(&self.config.name, index)),
            };

            if let Err(e) = outcome {
                warn!(worker = index, error = %e, "Bulk worker flush failed");
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// Commit what is left, then stop the workers. Stopping a stopped
    /// processor is a no-op.
    #[instrument(skip(self), fields(name = %self.config.name))]
    pub async fn stop(&self) -> Result<(), EngineError<S::Error>> {
        let Some(handles) = self.workers.write().await.take() else {
            return Ok(());
        };

        let mut result = Ok(());
        for (index, handle) in handles.into_iter().enumerate() {
            drop(handle.sender);
            if let Err(e) = handle.join.await {
                error!(worker = index, error = %e, "Bulk worker terminated abnormally");
                if result.is_ok() {
                    result = Err(EngineError::worker_gone(&self.config.name, index));
                }
            }
        }

        info!("Bulk processor stopped");
        result
    }

    /// Same as [`stop`](Self::stop).
    pub async fn close(&self) -> Result<(), EngineError<S::Error>> {
        self.stop().await
    }
}

impl<S: BulkService> fmt::Debug for BulkProcessor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkProcessor")
            .field("name", &self.config.name)
            .field("workers", &self.config.workers)
            .field("bulk_actions", &self.config.bulk_actions)
            .field("bulk_size", &self.config.bulk_size)
            .field("flush_interval", &self.config.flush_interval)
            .finish()
    }
}

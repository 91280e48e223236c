//! Background worker that buffers requests and commits them in batches.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, warn};

use crate::processor::ProcessorConfig;
use crate::service::{BulkService, Bulkable};

/// Capacity of each worker's queue; `add` waits while it is full.
const QUEUE_CAPACITY: usize = 1024;

pub(crate) enum WorkerCommand<R, E> {
    Add(R),
    Flush(oneshot::Sender<Result<(), E>>),
}

pub(crate) type CommandSender<S> =
    mpsc::Sender<WorkerCommand<<S as BulkService>::Request, <S as BulkService>::Error>>;

pub(crate) struct WorkerHandle<S: BulkService> {
    pub(crate) sender: CommandSender<S>,
    pub(crate) join: JoinHandle<()>,
}

pub(crate) struct BulkWorker<S: BulkService> {
    index: usize,
    service: Arc<S>,
    config: Arc<ProcessorConfig<S>>,
    execution_id: Arc<AtomicI64>,
    receiver: mpsc::Receiver<WorkerCommand<S::Request, S::Error>>,
    requests: Vec<S::Request>,
    size_in_bytes: usize,
}

impl<S: BulkService> BulkWorker<S> {
    pub(crate) fn spawn(
        index: usize,
        service: Arc<S>,
        config: Arc<ProcessorConfig<S>>,
        execution_id: Arc<AtomicI64>,
    ) -> WorkerHandle<S> {
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        let worker = Self {
            index,
            service,
            config,
            execution_id,
            receiver,
            requests: Vec::new(),
            size_in_bytes: 0,
        };

        WorkerHandle {
            sender,
            join: tokio::spawn(worker.run()),
        }
    }

    async fn run(mut self) {
        let mut ticker = self.config.flush_interval.map(|period| {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        loop {
            tokio::select! {
                command = self.receiver.recv() => match command {
                    Some(WorkerCommand::Add(request)) => {
                        self.size_in_bytes += request.estimated_size_in_bytes();
                        self.requests.push(request);
                        if self.commit_required() {
                            let _ = self.commit().await;
                        }
                    }
                    Some(WorkerCommand::Flush(ack)) => {
                        let result = self.commit().await;
                        let _ = ack.send(result);
                    }
                    None => {
                        let _ = self.commit().await;
                        break;
                    }
                },
                _ = next_tick(&mut ticker) => {
                    let _ = self.commit().await;
                }
            }
        }

        debug!(name = %self.config.name, worker = self.index, "Bulk worker stopped");
    }

    fn commit_required(&self) -> bool {
        self.config
            .bulk_actions
            .is_some_and(|max| self.requests.len() >= max)
            || self
                .config
                .bulk_size
                .is_some_and(|max| self.size_in_bytes >= max)
    }

    /// Commit everything buffered so far as one execution.
    ///
    /// The batch is discarded afterwards whether or not the commit succeeded.
    async fn commit(&mut self) -> Result<(), S::Error> {
        if self.requests.is_empty() {
            return Ok(());
        }

        let requests = std::mem::take(&mut self.requests);
        self.size_in_bytes = 0;
        let execution_id = self.execution_id.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(before) = &self.config.before {
            before(execution_id, &requests);
        }

        let started = Instant::now();
        let result = self.commit_with_retry(execution_id, &requests).await;

        match &result {
            Ok(_) => debug!(
                name = %self.config.name,
                worker = self.index,
                execution_id,
                count = requests.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Bulk commit succeeded"
            ),
            Err(e) => error!(
                name = %self.config.name,
                worker = self.index,
                execution_id,
                count = requests.len(),
                error = %e,
                "Bulk commit failed"
            ),
        }

        if let Some(after) = &self.config.after {
            after(
                execution_id,
                &requests,
                result.as_ref().ok(),
                result.as_ref().err(),
            );
        }

        result.map(|_| ())
    }

    async fn commit_with_retry(
        &self,
        execution_id: i64,
        requests: &[S::Request],
    ) -> Result<S::Response, S::Error> {
        let mut retry = 0u32;
        loop {
            let error = match self.service.commit(requests).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            if !self.service.is_retryable(&error) {
                return Err(error);
            }

            retry += 1;
            let Some(delay) = self.config.backoff.next(retry) else {
                return Err(error);
            };

            warn!(
                name = %self.config.name,
                execution_id,
                retry,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Retrying bulk commit"
            );
            time::sleep(delay).await;
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

//! Input loop feeding a bulk processor.

use std::future::Future;

use bulk_processor_repository::GenericBulkProcessor;
use bulk_processor_shared::BulkProcessorError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, instrument, warn};

use crate::input::parse_line;
use crate::BulkIndexerError;

/// Counts of one input run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSummary {
    /// Requests handed to the processor.
    pub submitted: usize,
    /// Lines skipped because they could not be turned into a request.
    pub rejected: usize,
}

/// Read operations from `reader` until it ends or `shutdown` completes, then
/// flush the processor.
///
/// Invalid lines are logged and skipped. Processor errors other than a
/// rejected request end the run.
#[instrument(skip_all)]
pub async fn run<P, R, S>(
    processor: &P,
    reader: R,
    shutdown: S,
) -> Result<IndexSummary, BulkIndexerError>
where
    P: GenericBulkProcessor + ?Sized,
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = reader.lines();
    let mut summary = IndexSummary::default();
    let mut line_no = 0;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input ended");
                    break;
                };
                line_no += 1;

                let request = match parse_line(line_no, &line) {
                    Ok(Some(request)) => request,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!(error = %e, "Skipping invalid input");
                        summary.rejected += 1;
                        continue;
                    }
                };

                match processor.add(request).await {
                    Ok(()) => summary.submitted += 1,
                    Err(e @ BulkProcessorError::UnsupportedRequest(_)) => {
                        warn!(line = line_no, error = %e, "Skipping unsupported request");
                        summary.rejected += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            _ = &mut shutdown => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    if let Err(e) = processor.flush().await {
        warn!(error = %e, "Failed to flush remaining requests");
    }

    info!(
        submitted = summary.submitted,
        rejected = summary.rejected,
        "Input processed"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bulk_processor_shared::GenericBulkableAddRequest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockProcessor {
        added: Mutex<Vec<GenericBulkableAddRequest>>,
        flushes: AtomicUsize,
        stopped: bool,
    }

    #[async_trait]
    impl GenericBulkProcessor for MockProcessor {
        async fn add(&self, request: GenericBulkableAddRequest) -> Result<(), BulkProcessorError> {
            if self.stopped {
                return Err(BulkProcessorError::not_running("mock"));
            }
            request.validate()?;
            self.added.lock().unwrap().push(request);
            Ok(())
        }

        async fn flush(&self) -> Result<(), BulkProcessorError> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn start(&self) -> Result<(), BulkProcessorError> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), BulkProcessorError> {
            Ok(())
        }

        async fn close(&self) -> Result<(), BulkProcessorError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_run_submits_in_order_and_flushes() {
        let input = concat!(
            r#"{"op":"index","index":"docs","id":"1","doc":{"a":1}}"#,
            "\n\n",
            r#"{"op":"upsert","index":"docs","id":"2","doc":{}}"#,
            "\n",
            r#"{"op":"delete","index":"","id":"3"}"#,
            "\n",
            r#"{"op":"delete","index":"docs","id":"4"}"#,
            "\n",
        );
        let processor = MockProcessor::default();

        let summary = run(&processor, input.as_bytes(), std::future::pending())
            .await
            .unwrap();

        assert_eq!(
            summary,
            IndexSummary {
                submitted: 2,
                rejected: 2
            }
        );
        let ids: Vec<String> = processor
            .added
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.id.clone())
            .collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(processor.flushes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (_writer, reader) = tokio::io::duplex(64);
        let processor = MockProcessor::default();

        let summary = run(&processor, tokio::io::BufReader::new(reader), async {})
            .await
            .unwrap();

        assert_eq!(summary, IndexSummary::default());
        assert_eq!(processor.flushes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_fails_when_processor_is_stopped() {
        let processor = MockProcessor {
            stopped: true,
            ..Default::default()
        };
        let input = r#"{"op":"delete","index":"docs","id":"1"}"#;

        let result = run(&processor, input.as_bytes(), std::future::pending()).await;

        assert!(matches!(
            result,
            Err(BulkIndexerError::ProcessorError(BulkProcessorError::NotRunning(_)))
        ));
    }
}

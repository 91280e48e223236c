//! Seams between the engine and a concrete bulk backend.

use std::fmt::Debug;

use async_trait::async_trait;

/// A single request that can be part of a bulk body.
pub trait Bulkable: Debug + Clone + Send + Sync + 'static {
    /// The action name of this request (`index`, `create`, `delete`, ...).
    fn op_type(&self) -> &str;

    /// The NDJSON lines this request contributes to a bulk body, without
    /// trailing newlines.
    fn source(&self) -> Result<Vec<String>, serde_json::Error>;

    /// Approximate number of bytes this request adds to a bulk body.
    ///
    /// Requests that fail to serialize count as zero; the failure surfaces
    /// when the batch is committed.
    fn estimated_size_in_bytes(&self) -> usize {
        self.source()
            .map(|lines| lines.iter().map(|line| line.len() + 1).sum())
            .unwrap_or(0)
    }
}

/// Commits batches of native requests to a backend.
///
/// Implementations are shared between all workers of a processor and must
/// be `Send + Sync`.
#[async_trait]
pub trait BulkService: Send + Sync + 'static {
    type Request: Bulkable;
    type Response: Debug + Send + Sync + 'static;
    type Error: std::error::Error + Clone + Send + Sync + 'static;

    /// Send one batch. The slice is never empty.
    async fn commit(&self, requests: &[Self::Request]) -> Result<Self::Response, Self::Error>;

    /// Whether a failed commit may be retried under the backoff policy.
    fn is_retryable(&self, _error: &Self::Error) -> bool {
        true
    }

    /// Called once every time the processor starts.
    async fn healthcheck(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Join the NDJSON lines of all requests into a bulk body.
pub fn encode_body<R: Bulkable>(requests: &[R]) -> Result<String, serde_json::Error> {
    let mut body = String::new();
    for request in requests {
        for line in request.source()? {
            body.push_str(&line);
            body.push('\n');
        }
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Line(&'static str);

    impl Bulkable for Line {
        fn op_type(&self) -> &str {
            "index"
        }

        fn source(&self) -> Result<Vec<String>, serde_json::Error> {
            Ok(vec![self.0.to_string(), "{}".to_string()])
        }
    }

    #[test]
    fn test_encode_body_terminates_every_line() {
        let body = encode_body(&[Line("a"), Line("b")]).unwrap();
        assert_eq!(body, "a\n{}\nb\n{}\n");
    }

    #[test]
    fn test_estimated_size_counts_newlines() {
        assert_eq!(Line("abc").estimated_size_in_bytes(), 7);
    }
}

//! Normalized backend error.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// Status used when the underlying error carries no backend status code.
pub const UNKNOWN_STATUS_CODE: i32 = -1;

/// A backend error normalized across versions.
///
/// `status` is the backend's HTTP status when the native error exposes one,
/// otherwise [`UNKNOWN_STATUS_CODE`]. `details` always keeps the original
/// error so callers can inspect or downcast it.
#[derive(Error, Debug, Clone)]
#[error("{details} (status {status})")]
pub struct GenericError {
    pub status: i32,
    #[source]
    pub details: Arc<dyn StdError + Send + Sync>,
}

impl GenericError {
    /// Wrap an error with a known status.
    pub fn new(status: i32, details: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            status,
            details: Arc::new(details),
        }
    }

    /// Wrap an error whose status is unknown.
    pub fn unknown(details: impl StdError + Send + Sync + 'static) -> Self {
        Self::new(UNKNOWN_STATUS_CODE, details)
    }

    /// Whether the status is [`UNKNOWN_STATUS_CODE`].
    pub fn is_unknown(&self) -> bool {
        self.status == UNKNOWN_STATUS_CODE
    }

    /// Downcast the original error to a concrete type.
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.details.downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unknown_keeps_details() {
        let err = GenericError::unknown(io::Error::new(io::ErrorKind::Other, "boom"));

        assert!(err.is_unknown());
        assert_eq!(err.status, UNKNOWN_STATUS_CODE);
        assert_eq!(
            err.downcast_ref::<io::Error>().map(|e| e.kind()),
            Some(io::ErrorKind::Other)
        );
        assert_eq!(err.to_string(), "boom (status -1)");
    }

    #[test]
    fn test_known_status() {
        let err = GenericError::new(429, io::Error::new(io::ErrorKind::Other, "busy"));

        assert!(!err.is_unknown());
        assert_eq!(err.status, 429);
        assert!(err.source().is_some());
    }
}

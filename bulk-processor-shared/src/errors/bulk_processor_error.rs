//! Errors returned by bulk processor operations.

use thiserror::Error;

use super::generic_error::{GenericError, UNKNOWN_STATUS_CODE};

/// Errors that can occur while building or driving a bulk processor.
#[derive(Error, Debug, Clone)]
pub enum BulkProcessorError {
    /// The processor parameters were rejected.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The request cannot be translated into a bulk action.
    #[error("Unsupported request: {0}")]
    UnsupportedRequest(String),

    /// The processor is not running.
    #[error("Bulk processor {0:?} is not running")]
    NotRunning(String),

    /// The backend or the batching engine reported an error.
    #[error("Backend error: {0}")]
    Backend(#[from] GenericError),
}

impl BulkProcessorError {
    /// Create an invalid parameters error.
    pub fn invalid_parameters(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }

    /// Create an unsupported request error.
    pub fn unsupported_request(msg: impl Into<String>) -> Self {
        Self::UnsupportedRequest(msg.into())
    }

    /// Create a not running error.
    pub fn not_running(name: impl Into<String>) -> Self {
        Self::NotRunning(name.into())
    }

    /// Backend status code, or [`UNKNOWN_STATUS_CODE`] for local errors.
    pub fn status(&self) -> i32 {
        match self {
            Self::Backend(err) => err.status,
            _ => UNKNOWN_STATUS_CODE,
        }
    }
}

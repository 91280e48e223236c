//! Native error type shared by the version adapters.

use std::fmt;
use std::sync::Arc;

use bulk_processor_shared::{GenericError, UNKNOWN_STATUS_CODE};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::transport::{TransportError, TransportResponse};

/// Errors produced by a native bulk commit.
#[derive(Error, Debug, Clone)]
pub enum ElasticError {
    /// The backend answered with a non-2xx status.
    #[error("{0}")]
    Api(ApiError),

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The bulk body could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[source] Arc<serde_json::Error>),

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[source] Arc<serde_json::Error>),
}

impl ElasticError {
    pub fn serialization(err: serde_json::Error) -> Self {
        Self::Serialization(Arc::new(err))
    }

    pub fn decode(err: serde_json::Error) -> Self {
        Self::Decode(Arc::new(err))
    }

    /// HTTP status returned by the backend, if any.
    pub fn status(&self) -> Option<i32> {
        match self {
            Self::Api(api) => Some(api.status),
            _ => None,
        }
    }

    /// Whether a commit failing with this error is worth retrying.
    ///
    /// Transport failures, throttling and gateway errors are retried; every
    /// other API error, and local encode/decode failures, are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api(api) => matches!(api.status, 429 | 502 | 503 | 504),
            Self::Serialization(_) | Self::Decode(_) => false,
        }
    }

    /// Turn a non-2xx response into an [`ElasticError::Api`].
    pub fn check_response(response: TransportResponse) -> Result<TransportResponse, Self> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(Self::Api(ApiError::from_response(&response)))
        }
    }

    /// Normalize into a [`GenericError`], keeping this error as details.
    pub fn to_generic(&self) -> GenericError {
        GenericError::new(self.status().unwrap_or(UNKNOWN_STATUS_CODE), self.clone())
    }
}

/// Error document returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: i32,
    pub details: Option<ErrorDetails>,
}

impl ApiError {
    pub fn new(status: i32, details: Option<ErrorDetails>) -> Self {
        Self { status, details }
    }

    /// Parse the `error` field of a failed response.
    ///
    /// The field is an object on current versions and a bare string on some
    /// older ones; anything else leaves `details` empty.
    pub fn from_response(response: &TransportResponse) -> Self {
        let details = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|body| body.get("error").cloned())
            .and_then(|error| match error {
                Value::String(reason) => Some(ErrorDetails {
                    reason,
                    ..Default::default()
                }),
                other => serde_json::from_value::<ErrorDetails>(other).ok(),
            });

        Self::new(i32::from(response.status), details)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) if !details.error_type.is_empty() => write!(
                f,
                "elastic: Error {} ({}): {} [type={}]",
                self.status,
                status_text(self.status),
                details.reason,
                details.error_type
            ),
            Some(details) => write!(
                f,
                "elastic: Error {} ({}): {}",
                self.status,
                status_text(self.status),
                details.reason
            ),
            None => write!(f, "elastic: Error {} ({})", self.status, status_text(self.status)),
        }
    }
}

impl std::error::Error for ApiError {}

/// Structured error detail reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorDetails {
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub caused_by: Option<Value>,
    #[serde(default)]
    pub root_cause: Vec<ErrorDetails>,
}

fn status_text(status: i32) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        413 => "Payload Too Large",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_object() {
        let response = TransportResponse::new(
            400,
            r#"{"error":{"type":"illegal_argument_exception","reason":"bad","root_cause":[{"type":"x","reason":"y"}]},"status":400}"#,
        );

        let err = ElasticError::check_response(response).unwrap_err();

        assert_eq!(err.status(), Some(400));
        match &err {
            ElasticError::Api(api) => {
                let details = api.details.as_ref().unwrap();
                assert_eq!(details.error_type, "illegal_argument_exception");
                assert_eq!(details.reason, "bad");
                assert_eq!(details.root_cause.len(), 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "elastic: Error 400 (Bad Request): bad [type=illegal_argument_exception]"
        );
    }

    #[test]
    fn test_api_error_from_string_and_garbage() {
        let api = ApiError::from_response(&TransportResponse::new(404, r#"{"error":"no such index"}"#));
        assert_eq!(api.details.unwrap().reason, "no such index");

        let api = ApiError::from_response(&TransportResponse::new(502, "<html>bad gateway</html>"));
        assert_eq!(api.status, 502);
        assert!(api.details.is_none());
    }

    #[test]
    fn test_success_passes_through() {
        let response = TransportResponse::new(200, "{}");
        assert_eq!(ElasticError::check_response(response.clone()).unwrap(), response);
    }

    #[test]
    fn test_to_generic_keeps_status() {
        let err = ElasticError::Api(ApiError::new(503, None));
        let generic = err.to_generic();

        assert_eq!(generic.status, 503);
        assert!(generic.downcast_ref::<ElasticError>().is_some());
    }

    #[test]
    fn test_to_generic_without_status_is_unknown() {
        let err = ElasticError::Transport(TransportError::connection("refused"));
        let generic = err.to_generic();

        assert_eq!(generic.status, UNKNOWN_STATUS_CODE);
        assert!(matches!(
            generic.downcast_ref::<ElasticError>(),
            Some(ElasticError::Transport(_))
        ));

        let decode = serde_json::from_str::<Value>("{").unwrap_err();
        assert!(ElasticError::decode(decode).to_generic().is_unknown());
    }

    #[test]
    fn test_retryable() {
        assert!(ElasticError::Transport(TransportError::connection("x")).is_retryable());
        assert!(ElasticError::Api(ApiError::new(429, None)).is_retryable());
        assert!(ElasticError::Api(ApiError::new(503, None)).is_retryable());
        assert!(!ElasticError::Api(ApiError::new(400, None)).is_retryable());
        assert!(!ElasticError::Api(ApiError::new(404, None)).is_retryable());
    }
}

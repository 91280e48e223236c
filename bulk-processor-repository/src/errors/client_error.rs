//! Client error types.
//!
//! This module defines the errors that can occur while building a client for
//! a backend cluster.

use thiserror::Error;

/// Errors that can occur while connecting to a backend cluster.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failed to reach the cluster or build the HTTP client.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The client configuration is invalid.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// The cluster runs a major version no adapter exists for.
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(String),
}

impl ClientError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an unsupported version error.
    pub fn unsupported_version(version: impl Into<String>) -> Self {
        Self::UnsupportedVersion(version.into())
    }
}

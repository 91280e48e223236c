//! # Bulk Processor
//!
//! Entry point and configuration for the bulk indexer binary.
//!
//! The binary reads one JSON operation per line from stdin and submits it to
//! a bulk processor for the configured (or detected) backend version.

pub mod config;
pub mod indexer;
pub mod input;

pub use config::{Dependencies, Settings};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum BulkIndexerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An input line could not be turned into a request.
    #[error("Invalid input on line {line}: {message}")]
    InputError { line: usize, message: String },

    /// Bulk processor error.
    #[error("Bulk processor error: {0}")]
    ProcessorError(#[from] bulk_processor_shared::BulkProcessorError),

    /// Client error.
    #[error("Client error: {0}")]
    ClientError(#[from] bulk_processor_repository::ClientError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BulkIndexerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an input error for a 1-based line number.
    pub fn input(line: usize, message: impl Into<String>) -> Self {
        Self::InputError {
            line,
            message: message.into(),
        }
    }
}

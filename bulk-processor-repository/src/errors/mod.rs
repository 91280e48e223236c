//! Error types for the bulk processor repository.

mod client_error;

pub use client_error::ClientError;

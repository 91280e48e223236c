//! Interface definitions for bulk processors.
//!
//! This module defines the version-neutral `GenericBulkProcessor` trait that
//! callers program against, whichever backend version is behind it.

mod bulk_processor;

pub use bulk_processor::GenericBulkProcessor;

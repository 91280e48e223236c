//! Error types shared by every version adapter.

mod bulk_processor_error;
mod generic_error;

pub use bulk_processor_error::BulkProcessorError;
pub use generic_error::{GenericError, UNKNOWN_STATUS_CODE};

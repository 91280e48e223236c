//! # Bulk Processor Shared
//!
//! Version-neutral data model for bulk writes. These types never mention a
//! backend version; version adapters translate their native requests,
//! responses and errors into them.

pub mod errors;
pub mod request;
pub mod response;

pub use errors::{BulkProcessorError, GenericError, UNKNOWN_STATUS_CODE};
pub use request::{BulkableRequestType, GenericBulkableAddRequest, GenericBulkableRequest};
pub use response::{
    GenericBulkItemError, GenericBulkResponse, GenericBulkResponseItem,
    GenericBulkResponseItemMap,
};

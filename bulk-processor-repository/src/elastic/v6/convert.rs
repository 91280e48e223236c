//! Generic model conversions for 6.x.

use bulk_processor_shared::{
    BulkProcessorError, BulkableRequestType, GenericBulkResponse, GenericBulkableAddRequest,
    GenericBulkableRequest, GenericError,
};

use super::request::{BulkDeleteRequest, BulkIndexRequest, BulkableRequest, DEFAULT_DOC_TYPE};
use super::V6BulkService;
use crate::bridge::VersionAdapter;
use crate::config::ElasticVersion;
use crate::elastic::response::{self, BulkResponse};
use crate::elastic::ElasticError;

/// Version adapter for 6.x clusters. Every request is written under
/// `doc_type`.
#[derive(Debug, Clone)]
pub struct V6Adapter {
    doc_type: String,
}

impl V6Adapter {
    pub fn new(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
        }
    }
}

impl Default for V6Adapter {
    fn default() -> Self {
        Self::new(DEFAULT_DOC_TYPE)
    }
}

impl VersionAdapter for V6Adapter {
    type Service = V6BulkService;

    fn version(&self) -> ElasticVersion {
        ElasticVersion::V6
    }

    fn to_native_request(
        &self,
        request: GenericBulkableAddRequest,
    ) -> Result<BulkableRequest, BulkProcessorError> {
        let request_type = request.request_type();
        if request_type == BulkableRequestType::Delete {
            return Ok(BulkDeleteRequest::new()
                .with_index(request.index)
                .with_type(self.doc_type.as_str())
                .with_id(request.id)
                .with_version_type(request.version_type)
                .with_version(request.version)
                .into());
        }

        let Some(doc) = request.doc else {
            return Err(BulkProcessorError::unsupported_request(format!(
                "{} request {:?} without document",
                request_type, request.id
            )));
        };
        let native = BulkIndexRequest::new()
            .with_op_type(request_type.as_str())
            .with_index(request.index)
            .with_type(self.doc_type.as_str())
            .with_id(request.id)
            .with_doc(doc);

        let native = if request_type == BulkableRequestType::Create {
            native.with_version_type(Some("internal".to_string()))
        } else {
            native
                .with_version_type(request.version_type)
                .with_version(request.version)
        };
        Ok(native.into())
    }

    fn to_generic_requests(&self, requests: &[BulkableRequest]) -> Vec<GenericBulkableRequest> {
        requests
            .iter()
            .map(|request| match request {
                BulkableRequest::Index(request) => GenericBulkableRequest {
                    op_type: if request.op_type() == "create" {
                        BulkableRequestType::Create
                    } else {
                        BulkableRequestType::Index
                    },
                    index: request.index().to_string(),
                    doc_type: Some(request.doc_type().to_string()),
                    id: request.id().to_string(),
                    version_type: request.version_type().map(str::to_string),
                    version: request.version(),
                    doc: request.doc().cloned(),
                },
                BulkableRequest::Delete(request) => GenericBulkableRequest {
                    op_type: BulkableRequestType::Delete,
                    index: request.index().to_string(),
                    doc_type: Some(request.doc_type().to_string()),
                    id: request.id().to_string(),
                    version_type: request.version_type().map(str::to_string),
                    version: request.version(),
                    doc: None,
                },
            })
            .collect()
    }

    fn to_generic_response(&self, native: Option<&BulkResponse>) -> GenericBulkResponse {
        response::to_generic_response(native)
    }

    fn to_generic_error(&self, error: &ElasticError) -> GenericError {
        error.to_generic()
    }
}

//! Generic model conversions for 7.x.

use bulk_processor_shared::{
    BulkProcessorError, BulkableRequestType, GenericBulkResponse, GenericBulkableAddRequest,
    GenericBulkableRequest, GenericError,
};

use super::request::{BulkDeleteRequest, BulkIndexRequest, BulkableRequest};
use super::V7BulkService;
use crate::bridge::VersionAdapter;
use crate::config::ElasticVersion;
use crate::elastic::response::{self, BulkResponse};
use crate::elastic::ElasticError;

/// Version adapter for 7.x clusters.
#[derive(Debug, Clone, Copy, Default)]
pub struct V7Adapter;

impl VersionAdapter for V7Adapter {
    type Service = V7BulkService;

    fn version(&self) -> ElasticVersion {
        ElasticVersion::V7
    }

    fn to_native_request(
        &self,
        request: GenericBulkableAddRequest,
    ) -> Result<BulkableRequest, BulkProcessorError> {
        let request_type = request.request_type();
        let native: BulkableRequest = match request_type {
            BulkableRequestType::Delete => BulkDeleteRequest::new()
                .with_index(request.index)
                .with_id(request.id)
                .with_version_type(request.version_type)
                .with_version(request.version)
                .into(),
            BulkableRequestType::Index => {
                let doc = request.doc.ok_or_else(|| missing_doc(request_type, &request.id))?;
                BulkIndexRequest::new()
                    .with_op_type(request_type.as_str())
                    .with_index(request.index)
                    .with_id(request.id)
                    .with_version_type(request.version_type)
                    .with_version(request.version)
                    .with_doc(doc)
                    .into()
            }
            // Create never carries the caller's versioning.
            BulkableRequestType::Create => {
                let doc = request.doc.ok_or_else(|| missing_doc(request_type, &request.id))?;
                BulkIndexRequest::new()
                    .with_op_type(request_type.as_str())
                    .with_index(request.index)
                    .with_id(request.id)
                    .with_version_type(Some("internal".to_string()))
                    .with_doc(doc)
                    .into()
            }
        };
        Ok(native)
    }

    fn to_generic_requests(&self, requests: &[BulkableRequest]) -> Vec<GenericBulkableRequest> {
        requests.iter().map(to_generic_request).collect()
    }

    fn to_generic_response(&self, native: Option<&BulkResponse>) -> GenericBulkResponse {
        response::to_generic_response(native)
    }

    fn to_generic_error(&self, error: &ElasticError) -> GenericError {
        error.to_generic()
    }
}

fn missing_doc(request_type: BulkableRequestType, id: &str) -> BulkProcessorError {
    BulkProcessorError::unsupported_request(format!(
        "{} request {:?} without document",
        request_type, id
    ))
}

fn to_generic_request(request: &BulkableRequest) -> GenericBulkableRequest {
    match request {
        BulkableRequest::Index(request) => GenericBulkableRequest {
            op_type: match request.op_type() {
                "create" => BulkableRequestType::Create,
                _ => BulkableRequestType::Index,
            },
            index: request.index().to_string(),
            doc_type: None,
            id: request.id().to_string(),
            version_type: request.version_type().map(str::to_string),
            version: request.version(),
            doc: request.doc().cloned(),
        },
        BulkableRequest::Delete(request) => GenericBulkableRequest {
            op_type: BulkableRequestType::Delete,
            index: request.index().to_string(),
            doc_type: None,
            id: request.id().to_string(),
            version_type: request.version_type().map(str::to_string),
            version: request.version(),
            doc: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elastic::error::ApiError;
    use crate::elastic::transport::TransportError;
    use bulk_processor_engine::Bulkable;
    use bulk_processor_shared::UNKNOWN_STATUS_CODE;
    use serde_json::json;

    #[test]
    fn test_index_keeps_versioning() {
        let request = GenericBulkableAddRequest::index("docs", "1", json!({"a": 1}))
            .with_version("external", 5);

        let native = V7Adapter.to_native_request(request).unwrap();

        match &native {
            BulkableRequest::Index(index) => {
                assert_eq!(index.op_type(), "index");
                assert_eq!(index.version_type(), Some("external"));
                assert_eq!(index.version(), Some(5));
                assert_eq!(index.doc(), Some(&json!({"a": 1})));
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_create_forces_internal_versioning() {
        for version_type in ["external", "external_gte", "force", "internal"] {
            let request = GenericBulkableAddRequest::create("docs", "1", json!({}))
                .with_version(version_type, 9);

            let native = V7Adapter.to_native_request(request).unwrap();

            assert_eq!(native.op_type(), "create");
            match native {
                BulkableRequest::Index(index) => {
                    assert_eq!(index.version_type(), Some("internal"));
                    assert_eq!(index.version(), None);
                }
                other => panic!("unexpected request {:?}", other),
            }
        }
    }

    #[test]
    fn test_delete_never_references_doc() {
        let mut request =
            GenericBulkableAddRequest::delete("docs", "doc2").with_version("external", 3);
        request.doc = Some(json!({"ignored": true}));

        let native = V7Adapter.to_native_request(request).unwrap();

        assert_eq!(native.op_type(), "delete");
        assert_eq!(native.source().unwrap().len(), 1);
        let generic = V7Adapter.to_generic_requests(&[native]);
        assert_eq!(generic[0].op_type, BulkableRequestType::Delete);
        assert_eq!(generic[0].version_type.as_deref(), Some("external"));
        assert_eq!(generic[0].version, Some(3));
        assert!(generic[0].doc.is_none());
    }

    #[test]
    fn test_index_without_doc_is_rejected() {
        let mut request = GenericBulkableAddRequest::index("docs", "1", json!({}));
        request.doc = None;

        assert!(matches!(
            V7Adapter.to_native_request(request),
            Err(BulkProcessorError::UnsupportedRequest(_))
        ));
    }

    #[test]
    fn test_generic_requests_keep_order() {
        let requests: Vec<BulkableRequest> = ["a", "b", "c"]
            .iter()
            .map(|id| {
                V7Adapter
                    .to_native_request(GenericBulkableAddRequest::index("docs", *id, json!({})))
                    .unwrap()
            })
            .collect();

        let ids: Vec<String> = V7Adapter
            .to_generic_requests(&requests)
            .into_iter()
            .map(|r| r.id)
            .collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_response_conversion() {
        let native = BulkResponse {
            took: 3,
            errors: false,
            items: Some(Vec::new()),
        };

        let generic = V7Adapter.to_generic_response(Some(&native));

        assert_eq!(generic.took, std::time::Duration::from_millis(3));
        assert_eq!(generic.items, Some(Vec::new()));
        assert_eq!(V7Adapter.to_generic_response(None), GenericBulkResponse::default());
    }

    #[test]
    fn test_error_status_conversion() {
        let api = ElasticError::Api(ApiError::new(404, None));
        assert_eq!(V7Adapter.to_generic_error(&api).status, 404);

        let transport = ElasticError::Transport(TransportError::connection("reset"));
        let generic = V7Adapter.to_generic_error(&transport);
        assert_eq!(generic.status, UNKNOWN_STATUS_CODE);
        assert!(generic.downcast_ref::<ElasticError>().is_some());
    }
}

//! Version-neutral bulk requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::BulkProcessorError;

/// The kind of a bulk action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkableRequestType {
    Index,
    Create,
    Delete,
}

impl BulkableRequestType {
    /// The action label used by the bulk API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }

    /// Whether requests of this kind must carry a document.
    pub fn requires_doc(&self) -> bool {
        matches!(self, Self::Index | Self::Create)
    }
}

impl fmt::Display for BulkableRequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulkableRequestType {
    type Err = BulkProcessorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index" => Ok(Self::Index),
            "create" => Ok(Self::Create),
            "delete" => Ok(Self::Delete),
            other => Err(BulkProcessorError::unsupported_request(format!(
                "unknown operation kind {:?}",
                other
            ))),
        }
    }
}

/// A request submitted to a bulk processor.
///
/// The kind is fixed by the constructor. `doc` is required for index and
/// create requests and ignored for deletes.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericBulkableAddRequest {
    request_type: BulkableRequestType,
    /// Target index name.
    pub index: String,
    /// Document identifier.
    pub id: String,
    /// Versioning scheme, e.g. `external`. Ignored for create requests.
    pub version_type: Option<String>,
    /// Document version. Ignored for create requests.
    pub version: Option<i64>,
    /// Document body.
    pub doc: Option<Value>,
}

impl GenericBulkableAddRequest {
    fn new(request_type: BulkableRequestType, index: String, id: String, doc: Option<Value>) -> Self {
        Self {
            request_type,
            index,
            id,
            version_type: None,
            version: None,
            doc,
        }
    }

    /// Index (create or replace) a document.
    pub fn index(index: impl Into<String>, id: impl Into<String>, doc: Value) -> Self {
        Self::new(BulkableRequestType::Index, index.into(), id.into(), Some(doc))
    }

    /// Create a document, failing on the backend if it already exists.
    pub fn create(index: impl Into<String>, id: impl Into<String>, doc: Value) -> Self {
        Self::new(BulkableRequestType::Create, index.into(), id.into(), Some(doc))
    }

    /// Delete a document.
    pub fn delete(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(BulkableRequestType::Delete, index.into(), id.into(), None)
    }

    /// Set the version and versioning scheme.
    pub fn with_version(mut self, version_type: impl Into<String>, version: i64) -> Self {
        self.version_type = Some(version_type.into());
        self.version = Some(version);
        self
    }

    pub fn request_type(&self) -> BulkableRequestType {
        self.request_type
    }

    /// Check the request can be turned into a bulk action.
    pub fn validate(&self) -> Result<(), BulkProcessorError> {
        if self.index.is_empty() {
            return Err(BulkProcessorError::unsupported_request(format!(
                "{} request without index",
                self.request_type
            )));
        }
        if self.id.is_empty() {
            return Err(BulkProcessorError::unsupported_request(format!(
                "{} request without id",
                self.request_type
            )));
        }
        if self.request_type.requires_doc() && self.doc.is_none() {
            return Err(BulkProcessorError::unsupported_request(format!(
                "{} request {:?} without document",
                self.request_type, self.id
            )));
        }
        Ok(())
    }
}

/// The version-neutral view of a queued native request, as handed to hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericBulkableRequest {
    pub op_type: BulkableRequestType,
    pub index: String,
    /// Mapping type, only set by backends that still use one.
    pub doc_type: Option<String>,
    pub id: String,
    pub version_type: Option<String>,
    pub version: Option<i64>,
    pub doc: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_type_labels() {
        for kind in [
            BulkableRequestType::Index,
            BulkableRequestType::Create,
            BulkableRequestType::Delete,
        ] {
            assert_eq!(kind.as_str().parse::<BulkableRequestType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_request_type_is_rejected() {
        let err = "update".parse::<BulkableRequestType>().unwrap_err();
        assert!(matches!(err, BulkProcessorError::UnsupportedRequest(_)));
    }

    #[test]
    fn test_constructors() {
        let index = GenericBulkableAddRequest::index("docs", "1", json!({"a": 1}))
            .with_version("external", 7);
        assert_eq!(index.request_type(), BulkableRequestType::Index);
        assert_eq!(index.version_type.as_deref(), Some("external"));
        assert_eq!(index.version, Some(7));

        let delete = GenericBulkableAddRequest::delete("docs", "2");
        assert_eq!(delete.request_type(), BulkableRequestType::Delete);
        assert!(delete.doc.is_none());
        assert!(delete.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_doc_for_index_and_create() {
        let mut create = GenericBulkableAddRequest::create("docs", "1", json!({}));
        assert!(create.validate().is_ok());

        create.doc = None;
        assert!(matches!(
            create.validate(),
            Err(BulkProcessorError::UnsupportedRequest(_))
        ));
    }

    #[test]
    fn test_validate_requires_index_and_id() {
        let request = GenericBulkableAddRequest::delete("", "1");
        assert!(request.validate().is_err());

        let request = GenericBulkableAddRequest::delete("docs", "");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_delete_ignores_doc() {
        let mut delete = GenericBulkableAddRequest::delete("docs", "1");
        delete.doc = Some(json!({"ignored": true}));
        assert!(delete.validate().is_ok());
    }
}

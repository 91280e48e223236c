//! Native 6.x bulk requests. Every action names a mapping type.

use bulk_processor_engine::Bulkable;
use serde_json::Value;

use crate::elastic::{action_lines, missing_doc, ActionMeta};

/// Mapping type used when none is set.
pub const DEFAULT_DOC_TYPE: &str = "_doc";

/// An `index` or `create` action.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkIndexRequest {
    op_type: String,
    index: String,
    doc_type: String,
    id: String,
    version_type: Option<String>,
    version: Option<i64>,
    doc: Option<Value>,
}

impl Default for BulkIndexRequest {
    fn default() -> Self {
        Self {
            op_type: "index".to_string(),
            index: String::new(),
            doc_type: DEFAULT_DOC_TYPE.to_string(),
            id: String::new(),
            version_type: None,
            version: None,
            doc: None,
        }
    }
}

impl BulkIndexRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_op_type(mut self, op_type: impl Into<String>) -> Self {
        self.op_type = op_type.into();
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    pub fn with_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = doc_type.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_version_type(mut self, version_type: Option<String>) -> Self {
        self.version_type = version_type;
        self
    }

    pub fn with_version(mut self, version: Option<i64>) -> Self {
        self.version = version;
        self
    }

    pub fn with_doc(mut self, doc: Value) -> Self {
        self.doc = Some(doc);
        self
    }

    pub fn op_type(&self) -> &str {
        &self.op_type
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version_type(&self) -> Option<&str> {
        self.version_type.as_deref()
    }

    pub fn version(&self) -> Option<i64> {
        self.version
    }

    pub fn doc(&self) -> Option<&Value> {
        self.doc.as_ref()
    }

    fn meta(&self) -> ActionMeta<'_> {
        ActionMeta {
            index: &self.index,
            doc_type: Some(&self.doc_type),
            id: &self.id,
            version: self.version,
            version_type: self.version_type.as_deref(),
        }
    }
}

/// A `delete` action.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDeleteRequest {
    index: String,
    doc_type: String,
    id: String,
    version_type: Option<String>,
    version: Option<i64>,
}

impl Default for BulkDeleteRequest {
    fn default() -> Self {
        Self {
            index: String::new(),
            doc_type: DEFAULT_DOC_TYPE.to_string(),
            id: String::new(),
            version_type: None,
            version: None,
        }
    }
}

impl BulkDeleteRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    pub fn with_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = doc_type.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_version_type(mut self, version_type: Option<String>) -> Self {
        self.version_type = version_type;
        self
    }

    pub fn with_version(mut self, version: Option<i64>) -> Self {
        self.version = version;
        self
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version_type(&self) -> Option<&str> {
        self.version_type.as_deref()
    }

    pub fn version(&self) -> Option<i64> {
        self.version
    }

    fn meta(&self) -> ActionMeta<'_> {
        ActionMeta {
            index: &self.index,
            doc_type: Some(&self.doc_type),
            id: &self.id,
            version: self.version,
            version_type: self.version_type.as_deref(),
        }
    }
}

/// Any 6.x bulk action accepted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkableRequest {
    Index(BulkIndexRequest),
    Delete(BulkDeleteRequest),
}

impl From<BulkIndexRequest> for BulkableRequest {
    fn from(request: BulkIndexRequest) -> Self {
        Self::Index(request)
    }
}

impl From<BulkDeleteRequest> for BulkableRequest {
    fn from(request: BulkDeleteRequest) -> Self {
        Self::Delete(request)
    }
}

impl Bulkable for BulkableRequest {
    fn op_type(&self) -> &str {
        match self {
            Self::Index(request) => request.op_type(),
            Self::Delete(_) => "delete",
        }
    }

    fn source(&self) -> Result<Vec<String>, serde_json::Error> {
        match self {
            Self::Index(request) => {
                let doc = request
                    .doc()
                    .ok_or_else(|| missing_doc(request.op_type(), request.id()))?;
                action_lines(request.op_type(), &request.meta(), Some(doc))
            }
            Self::Delete(request) => action_lines("delete", &request.meta(), None),
        }
    }
}

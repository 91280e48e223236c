//! Native wire types and services for Elasticsearch-compatible backends.

pub mod error;
pub mod response;
pub mod service;
pub mod transport;
pub mod v6;
pub mod v7;

use std::collections::BTreeMap;

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::Value;

pub use error::{ApiError, ElasticError, ErrorDetails};
pub use response::{BulkResponse, BulkResponseItem};
pub use service::ElasticBulkService;
pub use transport::{OpenSearchTransport, Transport, TransportError, TransportResponse};

/// Metadata of a bulk action line.
#[derive(Debug, Serialize)]
pub(crate) struct ActionMeta<'a> {
    #[serde(rename = "_index")]
    pub(crate) index: &'a str,
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub(crate) doc_type: Option<&'a str>,
    #[serde(rename = "_id")]
    pub(crate) id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) version_type: Option<&'a str>,
}

/// Build the NDJSON lines of one action: `{"<op>":{meta}}` then the document
/// when the action carries one.
pub(crate) fn action_lines(
    op_type: &str,
    meta: &ActionMeta<'_>,
    doc: Option<&Value>,
) -> Result<Vec<String>, serde_json::Error> {
    let action = BTreeMap::from([(op_type, meta)]);

    let mut lines = vec![serde_json::to_string(&action)?];
    if let Some(doc) = doc {
        lines.push(serde_json::to_string(doc)?);
    }
    Ok(lines)
}

pub(crate) fn missing_doc(op_type: &str, id: &str) -> serde_json::Error {
    serde_json::Error::custom(format!("{} request {:?} has no document", op_type, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_lines_skip_empty_meta() {
        let meta = ActionMeta {
            index: "docs",
            doc_type: None,
            id: "1",
            version: None,
            version_type: None,
        };

        let lines = action_lines("delete", &meta, None).unwrap();

        assert_eq!(lines, vec![r#"{"delete":{"_index":"docs","_id":"1"}}"#]);
    }

    #[test]
    fn test_action_lines_with_doc() {
        let meta = ActionMeta {
            index: "docs",
            doc_type: Some("_doc"),
            id: "1",
            version: Some(3),
            version_type: Some("external"),
        };

        let lines = action_lines("index", &meta, Some(&json!({"a": 1}))).unwrap();

        let action: Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(
            action,
            json!({"index": {"_index": "docs", "_type": "_doc", "_id": "1", "version": 3, "version_type": "external"}})
        );
        assert_eq!(lines[1], r#"{"a":1}"#);
    }
}

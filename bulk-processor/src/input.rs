//! NDJSON input format.
//!
//! One operation per line:
//!
//! ```text
//! {"op":"index","index":"docs","id":"1","doc":{"title":"hello"}}
//! {"op":"create","index":"docs","id":"2","doc":{"title":"new"}}
//! {"op":"delete","index":"docs","id":"3","version_type":"external","version":4}
//! ```
//!
//! Blank lines are skipped.

use bulk_processor_shared::{BulkableRequestType, GenericBulkableAddRequest};
use serde::Deserialize;
use serde_json::Value;

use crate::BulkIndexerError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InputLine {
    op: String,
    index: String,
    id: String,
    #[serde(default)]
    version_type: Option<String>,
    #[serde(default)]
    version: Option<i64>,
    #[serde(default)]
    doc: Option<Value>,
}

/// Parse line `line_no` (1-based) of the input.
pub fn parse_line(
    line_no: usize,
    line: &str,
) -> Result<Option<GenericBulkableAddRequest>, BulkIndexerError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let input: InputLine =
        serde_json::from_str(line).map_err(|e| BulkIndexerError::input(line_no, e.to_string()))?;
    let op: BulkableRequestType = input
        .op
        .parse()
        .map_err(|e: bulk_processor_shared::BulkProcessorError| {
            BulkIndexerError::input(line_no, e.to_string())
        })?;

    let mut request = match (op, input.doc) {
        (BulkableRequestType::Delete, _) => GenericBulkableAddRequest::delete(input.index, input.id),
        (BulkableRequestType::Index, Some(doc)) => {
            GenericBulkableAddRequest::index(input.index, input.id, doc)
        }
        (BulkableRequestType::Create, Some(doc)) => {
            GenericBulkableAddRequest::create(input.index, input.id, doc)
        }
        (op, None) => {
            return Err(BulkIndexerError::input(
                line_no,
                format!("{} requires a \"doc\" field", op),
            ))
        }
    };
    request.version_type = input.version_type;
    request.version = input.version;

    Ok(Some(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_index() {
        let request = parse_line(1, r#"{"op":"index","index":"docs","id":"1","doc":{"a":1}}"#)
            .unwrap()
            .unwrap();

        assert_eq!(request.request_type(), BulkableRequestType::Index);
        assert_eq!(request.index, "docs");
        assert_eq!(request.id, "1");
        assert_eq!(request.doc, Some(json!({"a": 1})));
        assert!(request.version.is_none());
    }

    #[test]
    fn test_parse_delete_with_version() {
        let request = parse_line(
            1,
            r#"{"op":"delete","index":"docs","id":"3","version_type":"external","version":4}"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(request.request_type(), BulkableRequestType::Delete);
        assert_eq!(request.version_type.as_deref(), Some("external"));
        assert_eq!(request.version, Some(4));
        assert!(request.doc.is_none());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert!(parse_line(1, "   ").unwrap().is_none());
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let err = parse_line(7, r#"{"op":"update","index":"docs","id":"1","doc":{}}"#).unwrap_err();

        match err {
            BulkIndexerError::InputError { line, message } => {
                assert_eq!(line, 7);
                assert!(message.contains("update"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_doc_and_bad_json() {
        assert!(parse_line(1, r#"{"op":"create","index":"docs","id":"1"}"#).is_err());
        assert!(parse_line(2, "{not json").is_err());
        assert!(parse_line(3, r#"{"op":"index","index":"docs","id":"1","doc":{},"extra":1}"#).is_err());
    }
}

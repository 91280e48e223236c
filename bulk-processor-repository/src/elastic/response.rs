//! Native `_bulk` responses and their generic conversion. 6.x and 7.x share
//! the same body; 7.x always reports `_doc` as the type.

use std::collections::HashMap;
use std::time::Duration;

use bulk_processor_shared::{GenericBulkItemError, GenericBulkResponse, GenericBulkResponseItem};
use serde::Deserialize;

use crate::elastic::ErrorDetails;

/// Body of a `_bulk` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BulkResponse {
    /// Milliseconds spent by the cluster.
    #[serde(default)]
    pub took: i64,
    #[serde(default)]
    pub errors: bool,
    #[serde(default)]
    pub items: Option<Vec<HashMap<String, BulkResponseItem>>>,
}

/// Result of one action, keyed by its action label in [`BulkResponse::items`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BulkResponseItem {
    #[serde(rename = "_index", default)]
    pub index: String,
    /// Mapping type the action was applied to.
    #[serde(rename = "_type", default)]
    pub doc_type: String,
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_version", default)]
    pub version: i64,
    #[serde(default)]
    pub result: String,
    #[serde(rename = "_seq_no", default)]
    pub seq_no: i64,
    #[serde(rename = "_primary_term", default)]
    pub primary_term: i64,
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub forced_refresh: bool,
    #[serde(default)]
    pub error: Option<ErrorDetails>,
}

/// Convert a native response. An absent response becomes the empty generic
/// response, a negative `took` becomes zero.
pub(crate) fn to_generic_response(response: Option<&BulkResponse>) -> GenericBulkResponse {
    let Some(response) = response else {
        return GenericBulkResponse::default();
    };

    GenericBulkResponse {
        took: Duration::from_millis(u64::try_from(response.took).unwrap_or(0)),
        errors: response.errors,
        items: response.items.as_ref().map(|items| {
            items
                .iter()
                .map(|map| {
                    map.iter()
                        .map(|(op, item)| (op.clone(), to_generic_item(item)))
                        .collect()
                })
                .collect()
        }),
    }
}

fn to_generic_item(item: &BulkResponseItem) -> GenericBulkResponseItem {
    GenericBulkResponseItem {
        index: item.index.clone(),
        doc_type: item.doc_type.clone(),
        id: item.id.clone(),
        version: item.version,
        result: item.result.clone(),
        seq_no: item.seq_no,
        primary_term: item.primary_term,
        status: item.status,
        forced_refresh: item.forced_refresh,
        error: item.error.as_ref().map(|e| GenericBulkItemError {
            error_type: e.error_type.clone(),
            reason: e.reason.clone(),
        }),
    }
}

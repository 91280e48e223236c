//! Version-neutral bulk responses.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-item results keyed by action label (`index`, `create`, `delete`).
pub type GenericBulkResponseItemMap = HashMap<String, GenericBulkResponseItem>;

/// Result of one bulk commit.
///
/// `items` is `None` when the backend returned no item list at all, and an
/// empty vector when it returned an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericBulkResponse {
    pub took: Duration,
    pub errors: bool,
    pub items: Option<Vec<GenericBulkResponseItemMap>>,
}

impl GenericBulkResponse {
    /// Iterate over every item result in submission order.
    pub fn item_results(&self) -> impl Iterator<Item = &GenericBulkResponseItem> {
        self.items.iter().flatten().flat_map(|map| map.values())
    }

    /// Number of items whose status is not 2xx.
    pub fn failed_count(&self) -> usize {
        self.item_results().filter(|item| !item.is_success()).count()
    }
}

/// Outcome of a single action inside a bulk commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericBulkResponseItem {
    pub index: String,
    pub doc_type: String,
    pub id: String,
    pub version: i64,
    pub result: String,
    pub seq_no: i64,
    pub primary_term: i64,
    /// HTTP-equivalent status of this action.
    pub status: i32,
    pub forced_refresh: bool,
    pub error: Option<GenericBulkItemError>,
}

impl GenericBulkResponseItem {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Reason reported by the backend for a failed action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericBulkItemError {
    pub error_type: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: i32) -> GenericBulkResponseItem {
        GenericBulkResponseItem {
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_response_has_no_items() {
        let response = GenericBulkResponse::default();

        assert_eq!(response.took, Duration::ZERO);
        assert!(!response.errors);
        assert!(response.items.is_none());
        assert_eq!(response.item_results().count(), 0);
    }

    #[test]
    fn test_failed_count() {
        let response = GenericBulkResponse {
            took: Duration::from_millis(3),
            errors: true,
            items: Some(vec![
                HashMap::from([("index".to_string(), item(201))]),
                HashMap::from([("delete".to_string(), item(404))]),
                HashMap::from([("create".to_string(), item(409))]),
            ]),
        };

        assert_eq!(response.item_results().count(), 3);
        assert_eq!(response.failed_count(), 2);
    }
}

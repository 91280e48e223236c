//! Settings read from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use bulk_processor_repository::{ElasticConfig, ElasticVersion};

use crate::BulkIndexerError;

/// Default cluster URL.
const DEFAULT_ELASTICSEARCH_URL: &str = "http://localhost:9200";

/// Default processor name.
const DEFAULT_PROCESSOR_NAME: &str = "bulk-processor";

/// Default flush interval in milliseconds.
const DEFAULT_FLUSH_INTERVAL_MS: u64 = 1000;

/// Everything the indexer needs to connect and batch.
#[derive(Debug, Clone)]
pub struct Settings {
    pub elastic: ElasticConfig,
    pub processor_name: String,
    pub workers: usize,
    pub bulk_actions: i64,
    pub bulk_size: i64,
    pub flush_interval: Duration,
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ELASTICSEARCH_URL`: cluster URL (default: http://localhost:9200)
    /// - `ELASTICSEARCH_VERSION`: `6` or `7`; detected from the cluster when unset
    /// - `ELASTICSEARCH_USERNAME` / `ELASTICSEARCH_PASSWORD`: basic auth
    /// - `ELASTICSEARCH_DOC_TYPE`: mapping type for 6.x (default: _doc)
    /// - `ELASTICSEARCH_TIMEOUT_MS`: per-request timeout
    /// - `BULK_PROCESSOR_NAME`: processor name (default: bulk-processor)
    /// - `BULK_WORKERS`: number of workers (default: 1)
    /// - `BULK_ACTIONS`: requests per batch, 0 or less for unlimited (default: 1000)
    /// - `BULK_SIZE`: bytes per batch, 0 or less for unlimited (default: 5 MiB)
    /// - `BULK_FLUSH_INTERVAL_MS`: periodic flush, 0 to disable (default: 1000)
    pub fn from_env() -> Result<Self, BulkIndexerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns a variable's value if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BulkIndexerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut elastic = ElasticConfig::new(
            lookup("ELASTICSEARCH_URL").unwrap_or_else(|| DEFAULT_ELASTICSEARCH_URL.to_string()),
        );

        if let Some(version) = lookup("ELASTICSEARCH_VERSION") {
            let version: ElasticVersion = version.parse()?;
            elastic = elastic.with_version(version);
        }
        if let Some(username) = lookup("ELASTICSEARCH_USERNAME") {
            elastic = elastic.with_basic_auth(
                username,
                lookup("ELASTICSEARCH_PASSWORD").unwrap_or_default(),
            );
        }
        if let Some(doc_type) = lookup("ELASTICSEARCH_DOC_TYPE") {
            elastic = elastic.with_doc_type(doc_type);
        }
        if let Some(timeout) = parse_var::<u64, _>(&lookup, "ELASTICSEARCH_TIMEOUT_MS")? {
            elastic = elastic.with_request_timeout(Duration::from_millis(timeout));
        }

        Ok(Self {
            elastic,
            processor_name: lookup("BULK_PROCESSOR_NAME")
                .unwrap_or_else(|| DEFAULT_PROCESSOR_NAME.to_string()),
            workers: parse_var(&lookup, "BULK_WORKERS")?.unwrap_or(1),
            bulk_actions: parse_var(&lookup, "BULK_ACTIONS")?.unwrap_or(1000),
            bulk_size: parse_var(&lookup, "BULK_SIZE")?.unwrap_or(5 << 20),
            flush_interval: Duration::from_millis(
                parse_var(&lookup, "BULK_FLUSH_INTERVAL_MS")?.unwrap_or(DEFAULT_FLUSH_INTERVAL_MS),
            ),
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, BulkIndexerError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|e| BulkIndexerError::config(format!("{}={:?}: {}", key, value, e)))
        })
        .transpose()
}

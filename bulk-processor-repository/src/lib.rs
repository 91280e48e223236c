//! # Bulk Processor Repository
//!
//! This crate hides the differences between Elasticsearch-compatible backend
//! versions behind one bulk processor interface. It includes the per-version
//! adapters and wire types, the callback bridge that presents engine hooks in
//! generic terms, and a client that picks the adapter for a cluster.
//!
//! ## Usage
//!
//! ```ignore
//! let client = ElasticClient::connect(&ElasticConfig::new("http://localhost:9200")).await?;
//! let processor = client
//!     .run_bulk_processor(BulkProcessorParameters::new("docs").with_num_of_workers(2))
//!     .await?;
//! processor.add(GenericBulkableAddRequest::index("docs", "1", json!({"a": 1}))).await?;
//! processor.close().await?;
//! ```

pub mod adapter;
pub mod bridge;
pub mod client;
pub mod config;
pub mod elastic;
pub mod errors;
pub mod interfaces;
pub mod parameters;
pub mod processor;

pub use adapter::{run_bulk_processor, VersionedBulkProcessor};
pub use bridge::VersionAdapter;
pub use client::ElasticClient;
pub use config::{ElasticConfig, ElasticVersion};
pub use errors::ClientError;
pub use interfaces::GenericBulkProcessor;
pub use parameters::{AfterFunc, BeforeFunc, BulkProcessorParameters};
pub use processor::ElasticBulkProcessor;

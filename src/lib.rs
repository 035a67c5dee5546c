//! Search upstream stub library
//!
//! A stand-in for an upstream content service, used while developing search
//! indexing consumers. It serves paginated resource listings over HTTP and
//! publishes the same records as Kafka messages.
//!
//! # Architecture
//!
//! - `pagination`: offset/limit query validation
//! - `models`: resource records and the listing body
//! - `catalog`: embedded fixtures and the `DataStore` seam
//! - `schema`: Avro schemas for the published events
//! - `publish`: encoding and concurrent fan-out to an `OutboundSink`
//! - `kafka`: rdkafka producer configuration and sink
//! - `api`: axum router for `/resources` and `/health`
//! - `sdk`: HTTP client for the listing API
//! - `config`, `logging`, `cli`, `commands`: the binary's ambient stack
//!
//! # Example
//!
//! ```
//! use search_upstream_stub::catalog::{Catalog, ListOptions};
//!
//! let catalog = Catalog::load_embedded().unwrap();
//! let page = catalog.page(ListOptions::new(0, 2));
//! assert_eq!(page.count, 2);
//! assert_eq!(page.total_count, catalog.listing().len());
//! ```

pub mod api;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod kafka;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod publish;
pub mod schema;
pub mod sdk;

// Re-export commonly used types
pub use catalog::{Catalog, DataStore};
pub use config::Config;
pub use error::{Result, StubError};
pub use models::{Resource, ResourceKind, Resources};
pub use pagination::{PaginationError, Paginator};
pub use publish::{Dispatcher, Encoder, OutboundSink};

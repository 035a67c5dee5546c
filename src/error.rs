//! Error types for the upstream stub
//!
//! This module defines the crate-level error type, using `thiserror` for
//! ergonomic error handling. Component errors (pagination, encoding,
//! publishing, sinks) live next to their components and convert into
//! [`StubError`].

use thiserror::Error;

use crate::pagination::PaginationError;
use crate::publish::{EncodeError, PublishError};

/// Main error type for upstream stub operations
#[derive(Error, Debug)]
pub enum StubError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A fixture could not be read or decoded while building the catalog
    #[error("Catalog load error: {file}: {reason}")]
    CatalogLoad {
        /// Fixture path that failed
        file: String,
        /// Decoder or layout error
        reason: String,
    },

    /// Invalid pagination query parameters
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    /// Resource could not be encoded for publishing
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Batch publishing could not start
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for binary-edge operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

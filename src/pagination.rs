//! Offset/limit validation for listing requests
//!
//! Raw query parameters are parsed against configured defaults and a
//! maximum page size. Validation is pure and deterministic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query parameter name for the page offset
pub const PARAM_OFFSET: &str = "offset";

/// Query parameter name for the page size
pub const PARAM_LIMIT: &str = "limit";

/// Pagination validation failures.
///
/// The messages are returned verbatim to HTTP callers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationError {
    /// Offset was not a non-negative integer.
    #[error("invalid offset query parameter")]
    InvalidOffset,

    /// Limit was not a non-negative integer.
    #[error("invalid limit query parameter")]
    InvalidLimit,

    /// Limit exceeded the configured maximum.
    #[error("limit query parameter is larger than the maximum allowed")]
    LimitOverMax,
}

/// Paginator holding the configured defaults and ceiling
///
/// # Examples
///
/// ```
/// use search_upstream_stub::pagination::Paginator;
///
/// let paginator = Paginator::new(20, 0, 1000);
/// assert_eq!(paginator.validate_parameters("", "").unwrap(), (0, 20));
/// assert_eq!(paginator.validate_parameters("5", "10").unwrap(), (5, 10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginator {
    /// Limit used when the request omits one
    pub default_limit: usize,
    /// Offset used when the request omits one
    pub default_offset: usize,
    /// Largest limit a request may ask for
    pub max_limit: usize,
}

impl Paginator {
    /// Creates a paginator from its defaults and maximum limit
    pub fn new(default_limit: usize, default_offset: usize, max_limit: usize) -> Self {
        Self {
            default_limit,
            default_offset,
            max_limit,
        }
    }

    /// Validates raw offset and limit strings
    ///
    /// Empty strings fall back to the configured defaults. A limit equal to
    /// `max_limit` is accepted; only a strictly larger one is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidOffset`] or
    /// [`PaginationError::InvalidLimit`] when a value is not a non-negative
    /// integer, and [`PaginationError::LimitOverMax`] when the limit exceeds
    /// the maximum.
    pub fn validate_parameters(
        &self,
        offset_param: &str,
        limit_param: &str,
    ) -> Result<(usize, usize), PaginationError> {
        let offset = parse_or_default(offset_param, self.default_offset)
            .ok_or(PaginationError::InvalidOffset)?;
        let limit = parse_or_default(limit_param, self.default_limit)
            .ok_or(PaginationError::InvalidLimit)?;

        if limit > self.max_limit {
            return Err(PaginationError::LimitOverMax);
        }

        Ok((offset, limit))
    }

    /// Same as [`Paginator::validate_parameters`] for optional inputs
    pub fn validate_optional(
        &self,
        offset_param: Option<&str>,
        limit_param: Option<&str>,
    ) -> Result<(usize, usize), PaginationError> {
        self.validate_parameters(offset_param.unwrap_or(""), limit_param.unwrap_or(""))
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(20, 0, 1000)
    }
}

// Parsed signed so that "-0" is accepted as zero.
fn parse_or_default(raw: &str, default: usize) -> Option<usize> {
    if raw.is_empty() {
        return Some(default);
    }
    raw.parse::<i64>()
        .ok()
        .filter(|value| *value >= 0)
        .and_then(|value| usize::try_from(value).ok())
}

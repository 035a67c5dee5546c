//! Paginated listing body.

use serde::{Deserialize, Serialize};

use crate::models::Resource;

/// One page of resources.
///
/// `total_count` is the size of the unfiltered collection, `count` the
/// number of items on this page.
///
/// # Examples
///
/// ```
/// use search_upstream_stub::models::Resources;
///
/// let page: Resources<u32> = Resources::new(vec![1, 2], 0, 2, 10);
/// assert_eq!(page.count, 2);
/// assert_eq!(page.total_count, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resources<T = Resource> {
    /// Items on this page.
    pub count: usize,
    /// Page items.
    pub items: Vec<T>,
    /// Limit applied to the page.
    pub limit: usize,
    /// Offset applied to the page.
    pub offset: usize,
    /// Size of the unfiltered collection.
    pub total_count: usize,
}

impl<T> Resources<T> {
    /// Builds a page, deriving `count` from `items`.
    pub fn new(items: Vec<T>, offset: usize, limit: usize, total_count: usize) -> Self {
        Self {
            count: items.len(),
            items,
            limit,
            offset,
            total_count,
        }
    }
}

//! In-memory resource catalog
//!
//! The catalog is loaded once from fixtures and then shared read-only.
//! Loading is fail-fast: one bad fixture fails the whole load.

pub mod fixtures;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StubError;
use crate::models::{Resource, ResourceKind, Resources};

/// Offset and limit of a listing request, already validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    pub offset: usize,
    pub limit: usize,
}

impl ListOptions {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

/// Read access to resources, as used by the HTTP layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Page over the listing kinds.
    async fn get_resources(&self, options: ListOptions) -> Result<Resources, StubError>;

    /// Page over exactly one kind.
    async fn get_resources_with_type(
        &self,
        kind: ResourceKind,
        options: ListOptions,
    ) -> Result<Resources, StubError>;
}

/// Returns the `[offset, offset + limit)` window of `items`.
///
/// Out-of-range windows are clamped; an offset at or past the end yields an
/// empty slice.
///
/// # Examples
///
/// ```
/// use search_upstream_stub::catalog::filter;
///
/// let items = [1, 2, 3, 4, 5];
/// assert_eq!(filter(&items, 1, 2), &[2, 3]);
/// assert_eq!(filter(&items, 3, 10), &[4, 5]);
/// assert!(filter(&items, 9, 1).is_empty());
/// ```
pub fn filter<T>(items: &[T], offset: usize, limit: usize) -> &[T] {
    if offset >= items.len() {
        return &[];
    }
    let upper = offset.saturating_add(limit).min(items.len());
    &items[offset..upper]
}

/// Load-once collection of every known resource.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    by_kind: BTreeMap<ResourceKind, Vec<Resource>>,
    listing: Vec<Resource>,
}

impl Catalog {
    /// Loads the fixtures embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns [`StubError::CatalogLoad`] for the first fixture that fails.
    pub fn load_embedded() -> Result<Self, StubError> {
        Self::from_fixtures(fixtures::embedded_fixtures())
    }

    /// Loads `(path, bytes)` fixtures laid out as `<kind_dir>/<name>.json`.
    ///
    /// Resources keep the iteration order within their kind.
    ///
    /// # Errors
    ///
    /// Returns [`StubError::CatalogLoad`] for the first fixture that fails.
    pub fn from_fixtures<I, P, B>(files: I) -> Result<Self, StubError>
    where
        I: IntoIterator<Item = (P, B)>,
        P: AsRef<str>,
        B: AsRef<[u8]>,
    {
        let mut resources = Vec::new();
        for (path, bytes) in files {
            resources.push(fixtures::parse_fixture(path.as_ref(), bytes.as_ref())?);
        }
        let catalog = Self::from_resources(resources);
        tracing::info!(
            total = catalog.len(),
            listing = catalog.listing.len(),
            "Resource catalog loaded"
        );
        Ok(catalog)
    }

    /// Builds a catalog from already decoded resources.
    pub fn from_resources(resources: Vec<Resource>) -> Self {
        let mut by_kind: BTreeMap<ResourceKind, Vec<Resource>> = BTreeMap::new();
        for resource in resources {
            by_kind.entry(resource.kind()).or_default().push(resource);
        }

        let listing = ResourceKind::ALL
            .into_iter()
            .filter(|kind| kind.is_listing())
            .flat_map(|kind| by_kind.get(&kind).cloned().unwrap_or_default())
            .collect();

        Self { by_kind, listing }
    }

    /// Resources of one kind, in load order.
    pub fn resources_of(&self, kind: ResourceKind) -> &[Resource] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Listing kinds, standard records first.
    pub fn listing(&self) -> &[Resource] {
        &self.listing
    }

    /// Total number of resources across all kinds.
    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Listing page.
    pub fn page(&self, options: ListOptions) -> Resources {
        page_of(&self.listing, options)
    }

    /// Page over a single kind.
    pub fn page_of_kind(&self, kind: ResourceKind, options: ListOptions) -> Resources {
        page_of(self.resources_of(kind), options)
    }
}

fn page_of(items: &[Resource], options: ListOptions) -> Resources {
    let window = filter(items, options.offset, options.limit).to_vec();
    Resources::new(window, options.offset, options.limit, items.len())
}

#[async_trait]
impl DataStore for Catalog {
    async fn get_resources(&self, options: ListOptions) -> Result<Resources, StubError> {
        tracing::debug!(offset = options.offset, limit = options.limit, "Listing resources");
        Ok(self.page(options))
    }

    async fn get_resources_with_type(
        &self,
        kind: ResourceKind,
        options: ListOptions,
    ) -> Result<Resources, StubError> {
        tracing::debug!(
            resource_type = %kind,
            offset = options.offset,
            limit = options.limit,
            "Listing resources of one type"
        );
        Ok(self.page_of_kind(kind, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentUpdatedResource, StandardResource};

    fn standard(uri: &str) -> Resource {
        Resource::Standard(StandardResource {
            uri: uri.to_string(),
            ..Default::default()
        })
    }

    fn content_updated(uri: &str) -> Resource {
        Resource::ContentUpdated(ContentUpdatedResource {
            uri: uri.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_filter_middle_window() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(filter(&items, 1, 3), &[2, 3, 4]);
    }

    #[test]
    fn test_filter_clamps_past_end() {
        let items = [1, 2, 3];
        assert_eq!(filter(&items, 2, 100), &[3]);
        assert!(filter(&items, 3, 1).is_empty());
        assert!(filter(&items, 50, 20).is_empty());
    }

    #[test]
    fn test_filter_handles_overflowing_window() {
        let items = [1, 2, 3];
        assert_eq!(filter(&items, 1, usize::MAX), &[2, 3]);
    }

    #[test]
    fn test_filter_zero_limit_is_empty() {
        let items = [1, 2, 3];
        assert!(filter(&items, 0, 0).is_empty());
    }

    #[test]
    fn test_filter_empty_input() {
        let items: [u8; 0] = [];
        assert!(filter(&items, 0, 10).is_empty());
    }

    #[test]
    fn test_filter_window_length_matches_bounds() {
        let items: Vec<usize> = (0..17).collect();
        for offset in 0..25 {
            for limit in 0..25 {
                let window = filter(&items, offset, limit);
                let expected = if offset >= items.len() {
                    0
                } else {
                    (items.len() - offset).min(limit)
                };
                assert_eq!(window.len(), expected);
                if let Some(first) = window.first() {
                    assert_eq!(*first, offset);
                }
            }
        }
    }

    #[test]
    fn test_page_reports_unfiltered_total() {
        let catalog = Catalog::from_resources(vec![standard("/a"), standard("/b"), standard("/c")]);
        let page = catalog.page(ListOptions::new(1, 1));
        assert_eq!(page.count, 1);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.items[0].uri(), "/b");
        assert_eq!(page.offset, 1);
        assert_eq!(page.limit, 1);
    }

    #[test]
    fn test_listing_excludes_event_kinds() {
        let catalog = Catalog::from_resources(vec![
            content_updated("/event"),
            standard("/a"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.listing().len(), 1);
        assert_eq!(catalog.page(ListOptions::new(0, 10)).total_count, 1);
        assert_eq!(
            catalog.resources_of(ResourceKind::ContentUpdated)[0].uri(),
            "/event"
        );
    }

    #[test]
    fn test_from_fixtures_keeps_order_within_kind() {
        let catalog = Catalog::from_fixtures(vec![
            ("standard/1.json", br#"{"uri": "/1"}"#.to_vec()),
            ("release/1.json", br#"{"uri": "/r"}"#.to_vec()),
            ("standard/2.json", br#"{"uri": "/2"}"#.to_vec()),
        ])
        .unwrap();
        let uris: Vec<&str> = catalog.listing().iter().map(Resource::uri).collect();
        assert_eq!(uris, vec!["/1", "/2", "/r"]);
    }

    #[test]
    fn test_from_fixtures_fails_fast() {
        let result = Catalog::from_fixtures(vec![
            ("standard/1.json", br#"{"uri": "/1"}"#.to_vec()),
            ("standard/2.json", b"oops".to_vec()),
        ]);
        assert!(matches!(
            result,
            Err(StubError::CatalogLoad { ref file, .. }) if file == "standard/2.json"
        ));
    }

    #[test]
    fn test_load_embedded_has_listing_records() {
        let catalog = Catalog::load_embedded().unwrap();
        assert!(!catalog.listing().is_empty());
        assert!(catalog.listing().iter().all(|r| r.kind().is_listing()));
        for kind in ResourceKind::ALL {
            assert!(!catalog.resources_of(kind).is_empty(), "missing {}", kind);
        }
    }

    #[tokio::test]
    async fn test_data_store_pages_by_type() {
        let catalog = Catalog::from_resources(vec![
            content_updated("/e1"),
            content_updated("/e2"),
            standard("/a"),
        ]);
        let page = catalog
            .get_resources_with_type(ResourceKind::ContentUpdated, ListOptions::new(1, 5))
            .await
            .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.items[0].uri(), "/e2");
    }

    #[tokio::test]
    async fn test_mock_data_store_can_fail() {
        let mut store = MockDataStore::new();
        store
            .expect_get_resources()
            .returning(|_| Err(StubError::Config("boom".to_string())));
        let result = store.get_resources(ListOptions::new(0, 1)).await;
        assert!(result.is_err());
    }
}

//! Resource records served by the listing API and published to Kafka.
//!
//! [`Resource`] is a closed enum over every record shape the stub knows.
//! Dispatch on the variant is always an exhaustive `match`, so adding a new
//! shape forces every consumer (listing, encoder, CLI output) to handle it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Descriptive metadata for a piece of published content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardResource {
    /// Canonical URI of the content.
    pub uri: String,
    /// Previous URI, when the content moved.
    pub uri_old: String,
    /// Content type, e.g. `api_dataset_landing_page`.
    pub content_type: String,
    /// Time series identifier.
    pub cdid: String,
    /// Dataset identifier.
    pub dataset_id: String,
    /// Dataset edition.
    pub edition: String,
    /// Description used for the page meta tags.
    pub meta_description: String,
    /// Release date as given by the source, usually RFC 3339. Not validated.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub release_date: String,
    /// Short summary.
    pub summary: String,
    /// Title.
    pub title: String,
    /// Topic identifiers.
    pub topics: Vec<String>,
    /// Language code.
    pub language: String,
    /// Survey name.
    pub survey: String,
    /// Canonical topic identifier.
    pub canonical_topic: String,
}

/// Release calendar fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseDetails {
    /// Release was cancelled.
    pub cancelled: bool,
    /// Release date is final.
    pub finalised: bool,
    /// Release has been published.
    pub published: bool,
    /// Date change notices.
    pub date_changes: Vec<String>,
    /// Provisional date text, e.g. `October-November 2024`.
    pub provisional_date: String,
}

/// Release calendar entry: standard metadata plus release fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseResource {
    /// Shared content metadata.
    #[serde(flatten)]
    pub standard: StandardResource,
    /// Release-specific fields.
    #[serde(flatten)]
    pub release: ReleaseDetails,
}

/// Legacy "content updated" event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentUpdatedResource {
    /// URI of the updated content.
    pub uri: String,
    /// Data type, e.g. `legacy` or `datasets`.
    pub data_type: String,
    /// Publishing collection identifier.
    pub collection_id: String,
    /// Reindex job identifier.
    pub job_id: String,
    /// Target search index.
    pub search_index: String,
    /// Correlation id for log tracing.
    pub trace_id: String,
}

/// "Search content updated" event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchContentUpdatedResource {
    /// Canonical content metadata.
    #[serde(flatten)]
    pub content: StandardResource,
    /// Release fields, for release calendar content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<ReleaseDetails>,
    /// Correlation id for log tracing.
    pub trace_id: String,
}

/// "Search content deleted" event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchContentDeletedResource {
    /// URI of the deleted content.
    pub uri: String,
    /// Publishing collection identifier.
    pub collection_id: String,
    /// Search index to delete from.
    pub search_index: String,
    /// Correlation id for log tracing.
    pub trace_id: String,
}

/// Discriminant of a [`Resource`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Standard,
    Release,
    ContentUpdated,
    SearchContentUpdated,
    SearchContentDeleted,
}

impl ResourceKind {
    /// Every kind, in listing order.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Standard,
        ResourceKind::Release,
        ResourceKind::ContentUpdated,
        ResourceKind::SearchContentUpdated,
        ResourceKind::SearchContentDeleted,
    ];

    /// Type name reported by [`Resource::resource_type`].
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Standard => "StandardResource",
            Self::Release => "ReleaseResource",
            Self::ContentUpdated => "ContentUpdatedResource",
            Self::SearchContentUpdated => "SearchContentUpdatedResource",
            Self::SearchContentDeleted => "SearchContentDeletedResource",
        }
    }

    /// Fixture directory holding records of this kind.
    pub fn fixture_dir(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Release => "release",
            Self::ContentUpdated => "content_updated",
            Self::SearchContentUpdated => "search_content_updated",
            Self::SearchContentDeleted => "search_content_deleted",
        }
    }

    /// Looks a kind up by fixture directory name.
    pub fn from_fixture_dir(dir: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.fixture_dir() == dir)
    }

    /// Whether records of this kind are served by the listing endpoint.
    pub fn is_listing(self) -> bool {
        matches!(self, Self::Standard | Self::Release)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    /// Accepts either the type name or the fixture directory name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == s || kind.fixture_dir() == s)
            .ok_or_else(|| format!("unknown resource type: {}", s))
    }
}

/// A resource record of any supported shape.
///
/// Serializes untagged: the listing body shows the record fields only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resource {
    Standard(StandardResource),
    Release(ReleaseResource),
    ContentUpdated(ContentUpdatedResource),
    SearchContentUpdated(SearchContentUpdatedResource),
    SearchContentDeleted(SearchContentDeletedResource),
}

impl Resource {
    /// Decodes a JSON record as the given kind.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the bytes are not a JSON object
    /// of the expected shape.
    pub fn from_json(kind: ResourceKind, bytes: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            ResourceKind::Standard => Self::Standard(serde_json::from_slice(bytes)?),
            ResourceKind::Release => Self::Release(serde_json::from_slice(bytes)?),
            ResourceKind::ContentUpdated => Self::ContentUpdated(serde_json::from_slice(bytes)?),
            ResourceKind::SearchContentUpdated => {
                Self::SearchContentUpdated(serde_json::from_slice(bytes)?)
            }
            ResourceKind::SearchContentDeleted => {
                Self::SearchContentDeleted(serde_json::from_slice(bytes)?)
            }
        })
    }

    /// Variant discriminant.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Standard(_) => ResourceKind::Standard,
            Self::Release(_) => ResourceKind::Release,
            Self::ContentUpdated(_) => ResourceKind::ContentUpdated,
            Self::SearchContentUpdated(_) => ResourceKind::SearchContentUpdated,
            Self::SearchContentDeleted(_) => ResourceKind::SearchContentDeleted,
        }
    }

    /// Type name used in logs and dispatch errors.
    pub fn resource_type(&self) -> &'static str {
        self.kind().type_name()
    }

    /// URI of the underlying content.
    pub fn uri(&self) -> &str {
        match self {
            Self::Standard(r) => &r.uri,
            Self::Release(r) => &r.standard.uri,
            Self::ContentUpdated(r) => &r.uri,
            Self::SearchContentUpdated(r) => &r.content.uri,
            Self::SearchContentDeleted(r) => &r.uri,
        }
    }

    /// Trace id carried by the record, if the shape has one and it is set.
    pub fn trace_id(&self) -> Option<&str> {
        let trace_id = match self {
            Self::Standard(_) | Self::Release(_) => return None,
            Self::ContentUpdated(r) => &r.trace_id,
            Self::SearchContentUpdated(r) => &r.trace_id,
            Self::SearchContentDeleted(r) => &r.trace_id,
        };
        if trace_id.is_empty() {
            None
        } else {
            Some(trace_id)
        }
    }

    /// Returns a copy carrying `trace_id`.
    ///
    /// An already-set trace id is kept. Shapes without a trace field are
    /// returned unchanged.
    pub fn with_trace_id(&self, trace_id: &str) -> Resource {
        let mut resource = self.clone();
        let slot = match &mut resource {
            Self::Standard(_) | Self::Release(_) => None,
            Self::ContentUpdated(r) => Some(&mut r.trace_id),
            Self::SearchContentUpdated(r) => Some(&mut r.trace_id),
            Self::SearchContentDeleted(r) => Some(&mut r.trace_id),
        };
        if let Some(slot) = slot {
            if slot.is_empty() {
                *slot = trace_id.to_string();
            }
        }
        resource
    }

    /// One-line description for terminal listings.
    pub fn summary_line(&self) -> String {
        match self {
            Self::Standard(r) => format!(
                "Title: {}, URL: {}, Content type: {}",
                r.title, r.uri, r.content_type
            ),
            Self::Release(r) => format!(
                "Title: {}, URL: {}, Provisional date: {}",
                r.standard.title, r.standard.uri, r.release.provisional_date
            ),
            Self::ContentUpdated(r) => format!(
                "URL: {}, CollectionID: {}, Data Type: {}",
                r.uri, r.collection_id, r.data_type
            ),
            Self::SearchContentUpdated(r) => format!(
                "Title: {}, URL: {}, Content type: {}",
                r.content.title, r.content.uri, r.content.content_type
            ),
            Self::SearchContentDeleted(r) => {
                format!("URL: {}, CollectionID: {}", r.uri, r.collection_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_updated(trace_id: &str) -> Resource {
        Resource::ContentUpdated(ContentUpdatedResource {
            uri: "/economy/inflationandpriceindices".to_string(),
            data_type: "legacy".to_string(),
            collection_id: "collection-1".to_string(),
            job_id: String::new(),
            search_index: "ons".to_string(),
            trace_id: trace_id.to_string(),
        })
    }

    #[test]
    fn test_resource_type_names() {
        let names: Vec<&str> = ResourceKind::ALL.iter().map(|k| k.type_name()).collect();
        assert_eq!(
            names,
            vec![
                "StandardResource",
                "ReleaseResource",
                "ContentUpdatedResource",
                "SearchContentUpdatedResource",
                "SearchContentDeletedResource",
            ]
        );
        assert_eq!(content_updated("").resource_type(), "ContentUpdatedResource");
    }

    #[test]
    fn test_kind_from_str_accepts_type_and_dir_names() {
        assert_eq!(
            "ReleaseResource".parse::<ResourceKind>(),
            Ok(ResourceKind::Release)
        );
        assert_eq!(
            "search_content_deleted".parse::<ResourceKind>(),
            Ok(ResourceKind::SearchContentDeleted)
        );
        assert!("Widget".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_fixture_dir_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_fixture_dir(kind.fixture_dir()), Some(kind));
        }
        assert_eq!(ResourceKind::from_fixture_dir("unknown"), None);
    }

    #[test]
    fn test_only_standard_and_release_are_listing_kinds() {
        let listing: Vec<ResourceKind> = ResourceKind::ALL
            .into_iter()
            .filter(|k| k.is_listing())
            .collect();
        assert_eq!(listing, vec![ResourceKind::Standard, ResourceKind::Release]);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let resource = Resource::from_json(ResourceKind::Standard, br#"{"uri": "/a/uri"}"#).unwrap();
        match resource {
            Resource::Standard(r) => {
                assert_eq!(r.uri, "/a/uri");
                assert!(r.title.is_empty());
                assert!(r.topics.is_empty());
                assert!(r.release_date.is_empty());
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_release_date_is_kept_verbatim() {
        let json = br#"{"uri": "/a", "release_date": "2024-11-21:20:14Z"}"#;
        let resource = Resource::from_json(ResourceKind::Standard, json).unwrap();
        match resource {
            Resource::Standard(r) => assert_eq!(r.release_date, "2024-11-21:20:14Z"),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_release_fields_are_flattened() {
        let json = br#"{
            "uri": "/releases/a",
            "title": "A release",
            "cancelled": true,
            "date_changes": ["a change_notice"],
            "provisional_date": "October-November 2024"
        }"#;
        let resource = Resource::from_json(ResourceKind::Release, json).unwrap();
        let Resource::Release(release) = &resource else {
            panic!("expected a release");
        };
        assert_eq!(release.standard.title, "A release");
        assert!(release.release.cancelled);
        assert!(!release.release.published);
        assert_eq!(release.release.date_changes, vec!["a change_notice"]);

        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["uri"], "/releases/a");
        assert_eq!(value["provisional_date"], "October-November 2024");
        assert!(value.get("release").is_none());
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(Resource::from_json(ResourceKind::ContentUpdated, b"[1, 2]").is_err());
        assert!(Resource::from_json(ResourceKind::ContentUpdated, b"not json").is_err());
    }

    #[test]
    fn test_trace_id_empty_is_none() {
        assert_eq!(content_updated("").trace_id(), None);
        assert_eq!(content_updated("abc").trace_id(), Some("abc"));
        assert_eq!(Resource::Standard(StandardResource::default()).trace_id(), None);
    }

    #[test]
    fn test_with_trace_id_never_overwrites() {
        let original = content_updated("existing");
        let updated = original.with_trace_id("new");
        assert_eq!(updated.trace_id(), Some("existing"));

        let blank = content_updated("");
        let updated = blank.with_trace_id("new");
        assert_eq!(updated.trace_id(), Some("new"));
        assert_eq!(blank.trace_id(), None);
    }

    #[test]
    fn test_with_trace_id_ignores_shapes_without_trace() {
        let resource = Resource::Standard(StandardResource::default());
        assert_eq!(resource.with_trace_id("x"), resource);
    }

    #[test]
    fn test_summary_line_mentions_uri() {
        let line = content_updated("").summary_line();
        assert!(line.contains("/economy/inflationandpriceindices"));
        assert!(line.contains("collection-1"));
    }
}

//! Publishing resources to topics
//!
//! - [`encoder`]: resource to wire message mapping
//! - [`sink`]: outbound destinations
//! - [`dispatcher`]: concurrent batch fan-out

pub mod dispatcher;
pub mod encoder;
pub mod sink;

pub use dispatcher::{
    stub_trace_id, DispatchReport, Dispatcher, EncodeMode, PublishError, PublishOutcome,
};
pub use encoder::{EncodeError, EncodedMessage, Encoder, TopicNames, WireFormat};
pub use sink::{MemorySink, OutboundSink, SentMessage, SinkError};

use crate::catalog::Catalog;
use crate::models::{PublishRequest, ResourceKind};

/// Builds a round-robin batch over the catalog.
///
/// For each `(kind, count)` pair, `count` requests are made from the
/// resources of that kind, cycling with `items[i % len]`. Kinds with no
/// resources are logged and skipped.
pub fn plan_batch(catalog: &Catalog, counts: &[(ResourceKind, usize)]) -> Vec<PublishRequest> {
    let mut requests = Vec::with_capacity(counts.iter().map(|(_, n)| n).sum());

    for &(kind, count) in counts {
        if count == 0 {
            continue;
        }
        let items = catalog.resources_of(kind);
        if items.is_empty() {
            tracing::warn!(
                resource_type = %kind,
                requested = count,
                "No resources of this type to publish, skipping"
            );
            continue;
        }
        requests.extend(
            (0..count).map(|i| PublishRequest::new(items[i % items.len()].clone())),
        );
    }

    requests
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentUpdatedResource, Resource, SearchContentDeletedResource};

    fn catalog() -> Catalog {
        Catalog::from_resources(vec![
            Resource::ContentUpdated(ContentUpdatedResource {
                uri: "/cu/0".to_string(),
                ..Default::default()
            }),
            Resource::ContentUpdated(ContentUpdatedResource {
                uri: "/cu/1".to_string(),
                ..Default::default()
            }),
            Resource::SearchContentDeleted(SearchContentDeletedResource {
                uri: "/scd/0".to_string(),
                ..Default::default()
            }),
        ])
    }

    #[test]
    fn test_plan_batch_round_robin() {
        let requests = plan_batch(&catalog(), &[(ResourceKind::ContentUpdated, 5)]);
        let uris: Vec<&str> = requests.iter().map(|r| r.resource.uri()).collect();
        assert_eq!(uris, vec!["/cu/0", "/cu/1", "/cu/0", "/cu/1", "/cu/0"]);
    }

    #[test]
    fn test_plan_batch_skips_empty_kinds() {
        let requests = plan_batch(
            &catalog(),
            &[
                (ResourceKind::SearchContentUpdated, 3),
                (ResourceKind::SearchContentDeleted, 2),
            ],
        );
        assert_eq!(requests.len(), 2);
        assert!(requests
            .iter()
            .all(|r| r.resource.kind() == ResourceKind::SearchContentDeleted));
    }

    #[test]
    fn test_plan_batch_zero_counts() {
        let requests = plan_batch(
            &catalog(),
            &[
                (ResourceKind::ContentUpdated, 0),
                (ResourceKind::SearchContentDeleted, 0),
            ],
        );
        assert!(requests.is_empty());
    }

    #[test]
    fn test_plan_batch_leaves_overrides_unset() {
        let requests = plan_batch(&catalog(), &[(ResourceKind::SearchContentDeleted, 1)]);
        assert!(requests[0].topic.is_none());
        assert!(requests[0].trace_id.is_none());
    }
}

//! Data model shared by the listing API and the publishing tools
//!
//! - [`Resource`]: closed enum over every record shape
//! - [`Resources`]: one page of the listing
//! - [`PublishRequest`]: a resource queued for publishing

pub mod resource;
pub mod resources;

pub use resource::{
    ContentUpdatedResource, ReleaseDetails, ReleaseResource, Resource, ResourceKind,
    SearchContentDeletedResource, SearchContentUpdatedResource, StandardResource,
};
pub use resources::Resources;

/// A resource queued for publishing.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRequest {
    /// Record to encode and send.
    pub resource: Resource,
    /// Topic override; the encoder's topic is used when unset.
    pub topic: Option<String>,
    /// Trace id used when the resource carries none.
    pub trace_id: Option<String>,
}

impl PublishRequest {
    /// Request with no overrides.
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            topic: None,
            trace_id: None,
        }
    }

    /// Sets the topic override.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Sets the fallback trace id.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

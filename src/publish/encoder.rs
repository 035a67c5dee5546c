//! Resource to wire message mapping
//!
//! Each publishable variant has exactly one wire format and one target topic.
//! Listing kinds are not events and are rejected.

use std::fmt;

use apache_avro::{to_avro_datum, to_value};
use serde::Serialize;
use thiserror::Error;

use crate::models::{ReleaseDetails, Resource, StandardResource};
use crate::schema::Schemas;

/// Encoding failures.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The variant has no wire mapping.
    #[error("unsupported resource type: {0}")]
    UnsupportedResourceType(&'static str),

    /// Avro serialization failed.
    #[error("avro encoding failed: {0}")]
    Avro(#[from] apache_avro::Error),

    /// JSON serialization failed.
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Payload serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    Avro,
    Json,
}

impl WireFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            WireFormat::Avro => "AVRO",
            WireFormat::Json => "JSON",
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded resource ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage {
    pub payload: Vec<u8>,
    pub format: WireFormat,
    pub topic: String,
    /// Label such as `ContentPublishedEvent(AVRO)`, used in logs.
    pub event_type: String,
}

/// Topic names the encoder routes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicNames {
    pub content_updated: String,
    pub search_content_updated: String,
    pub search_content_deleted: String,
}

impl Default for TopicNames {
    fn default() -> Self {
        Self {
            content_updated: "content-updated".to_string(),
            search_content_updated: "search-content-updated".to_string(),
            search_content_deleted: "search-content-deleted".to_string(),
        }
    }
}

/// Avro shape of the search content updated event.
///
/// Field order matches the schema.
#[derive(Debug, Serialize)]
struct SearchContentAvro<'a> {
    canonical_topic: &'a str,
    cdid: &'a str,
    content_type: &'a str,
    dataset_id: &'a str,
    edition: &'a str,
    language: &'a str,
    meta_description: &'a str,
    release_date: &'a str,
    summary: &'a str,
    survey: &'a str,
    title: &'a str,
    topics: &'a [String],
    uri: &'a str,
    uri_old: &'a str,
    release: ReleaseAvro<'a>,
}

#[derive(Debug, Serialize)]
struct ReleaseAvro<'a> {
    cancelled: bool,
    finalised: bool,
    published: bool,
    date_changes: &'a [String],
    provisional_date: &'a str,
}

impl<'a> SearchContentAvro<'a> {
    fn new(content: &'a StandardResource, release: Option<&'a ReleaseDetails>) -> Self {
        let release = match release {
            Some(r) => ReleaseAvro {
                cancelled: r.cancelled,
                finalised: r.finalised,
                published: r.published,
                date_changes: &r.date_changes,
                provisional_date: &r.provisional_date,
            },
            None => ReleaseAvro {
                cancelled: false,
                finalised: false,
                published: false,
                date_changes: &[],
                provisional_date: "",
            },
        };

        Self {
            canonical_topic: &content.canonical_topic,
            cdid: &content.cdid,
            content_type: &content.content_type,
            dataset_id: &content.dataset_id,
            edition: &content.edition,
            language: &content.language,
            meta_description: &content.meta_description,
            release_date: &content.release_date,
            summary: &content.summary,
            survey: &content.survey,
            title: &content.title,
            topics: &content.topics,
            uri: &content.uri,
            uri_old: &content.uri_old,
            release,
        }
    }
}

/// Maps resources to wire messages.
///
/// Stateless after construction and safe to share between tasks.
#[derive(Debug, Clone)]
pub struct Encoder {
    schemas: Schemas,
    topics: TopicNames,
}

impl Encoder {
    /// Builds an encoder routing to `topics`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Avro`] if a schema fails to parse.
    pub fn new(topics: TopicNames) -> Result<Self, EncodeError> {
        Ok(Self {
            schemas: Schemas::parse()?,
            topics,
        })
    }

    pub fn topics(&self) -> &TopicNames {
        &self.topics
    }

    /// Encodes an event resource for its topic.
    ///
    /// | Variant | Format | Topic |
    /// |---|---|---|
    /// | `ContentUpdated` | Avro (`content_published`) | content updated |
    /// | `SearchContentUpdated` | JSON | search content updated |
    /// | `SearchContentDeleted` | JSON | search content deleted |
    ///
    /// # Errors
    ///
    /// [`EncodeError::UnsupportedResourceType`] for listing kinds, otherwise
    /// any serializer error.
    pub fn encode(&self, resource: &Resource) -> Result<EncodedMessage, EncodeError> {
        match resource {
            Resource::ContentUpdated(r) => {
                let value = to_value(r)?;
                let payload = to_avro_datum(&self.schemas.content_published, value)?;
                Ok(self.message(
                    payload,
                    WireFormat::Avro,
                    &self.topics.content_updated,
                    "ContentPublishedEvent",
                ))
            }
            Resource::SearchContentUpdated(r) => Ok(self.message(
                serde_json::to_vec(r)?,
                WireFormat::Json,
                &self.topics.search_content_updated,
                "SearchContentUpdatedEvent",
            )),
            Resource::SearchContentDeleted(r) => Ok(self.message(
                serde_json::to_vec(r)?,
                WireFormat::Json,
                &self.topics.search_content_deleted,
                "SearchContentDeletedEvent",
            )),
            Resource::Standard(_) | Resource::Release(_) => {
                Err(EncodeError::UnsupportedResourceType(resource.resource_type()))
            }
        }
    }

    /// Encodes content metadata with the Avro search content updated schema.
    ///
    /// Accepts standard, release and search content updated resources;
    /// unset fields take their schema defaults.
    ///
    /// # Errors
    ///
    /// [`EncodeError::UnsupportedResourceType`] for event kinds without
    /// content metadata, otherwise any Avro error.
    pub fn encode_search_content_avro(
        &self,
        resource: &Resource,
    ) -> Result<EncodedMessage, EncodeError> {
        let record = match resource {
            Resource::Standard(r) => SearchContentAvro::new(r, None),
            Resource::Release(r) => SearchContentAvro::new(&r.standard, Some(&r.release)),
            Resource::SearchContentUpdated(r) => {
                SearchContentAvro::new(&r.content, r.release.as_ref())
            }
            Resource::ContentUpdated(_) | Resource::SearchContentDeleted(_) => {
                return Err(EncodeError::UnsupportedResourceType(
                    resource.resource_type(),
                ))
            }
        };

        let value = to_value(&record)?;
        let payload = to_avro_datum(&self.schemas.search_content_updated, value)?;
        Ok(self.message(
            payload,
            WireFormat::Avro,
            &self.topics.search_content_updated,
            "SearchContentUpdatedEvent",
        ))
    }

    fn message(
        &self,
        payload: Vec<u8>,
        format: WireFormat,
        topic: &str,
        event: &str,
    ) -> EncodedMessage {
        EncodedMessage {
            payload,
            format,
            topic: topic.to_string(),
            event_type: format!("{}({})", event, format),
        }
    }
}

//! Avro schemas for the legacy topics
//!
//! Both schemas are wire contracts shared with downstream consumers. Fields
//! may be appended (with defaults) but never removed or reordered.
//!
//! Record names use underscores: Avro names may not contain hyphens. Names
//! do not appear in the binary encoding.

use apache_avro::Schema;

/// Schema of the legacy "content published" event sent to the
/// content-updated topic.
pub const CONTENT_PUBLISHED_SCHEMA: &str = r#"{
  "type": "record",
  "name": "content_published",
  "fields": [
    {"name": "uri", "type": "string", "default": ""},
    {"name": "data_type", "type": "string", "default": ""},
    {"name": "collection_id", "type": "string", "default": ""},
    {"name": "job_id", "type": "string", "default": ""},
    {"name": "search_index", "type": "string", "default": ""},
    {"name": "trace_id", "type": "string", "default": ""}
  ]
}"#;

/// Schema of the Avro "search content updated" event.
pub const SEARCH_CONTENT_UPDATED_SCHEMA: &str = r#"{
  "type": "record",
  "name": "search_content_updated",
  "fields": [
    {"name": "canonical_topic", "type": "string", "default": ""},
    {"name": "cdid", "type": "string", "default": ""},
    {"name": "content_type", "type": "string", "default": ""},
    {"name": "dataset_id", "type": "string", "default": ""},
    {"name": "edition", "type": "string", "default": ""},
    {"name": "language", "type": "string", "default": ""},
    {"name": "meta_description", "type": "string", "default": ""},
    {"name": "release_date", "type": "string", "default": ""},
    {"name": "summary", "type": "string", "default": ""},
    {"name": "survey", "type": "string", "default": ""},
    {"name": "title", "type": "string", "default": ""},
    {"name": "topics", "type": {"type": "array", "items": "string"}, "default": []},
    {"name": "uri", "type": "string", "default": ""},
    {"name": "uri_old", "type": "string", "default": ""},
    {
      "name": "release",
      "type": {
        "type": "record",
        "name": "release",
        "fields": [
          {"name": "cancelled", "type": "boolean", "default": false},
          {"name": "finalised", "type": "boolean", "default": false},
          {"name": "published", "type": "boolean", "default": false},
          {"name": "date_changes", "type": {"type": "array", "items": "string"}, "default": []},
          {"name": "provisional_date", "type": "string", "default": ""}
        ]
      }
    }
  ]
}"#;

/// Parsed Avro schemas.
#[derive(Debug, Clone)]
pub struct Schemas {
    pub content_published: Schema,
    pub search_content_updated: Schema,
}

impl Schemas {
    /// Parses both schema definitions.
    ///
    /// # Errors
    ///
    /// Returns the Avro parse error if a definition is malformed.
    pub fn parse() -> Result<Self, apache_avro::Error> {
        Ok(Self {
            content_published: Schema::parse_str(CONTENT_PUBLISHED_SCHEMA)?,
            search_content_updated: Schema::parse_str(SEARCH_CONTENT_UPDATED_SCHEMA)?,
        })
    }
}

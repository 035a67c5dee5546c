//! Kafka producer configuration.
//!
//! # Example
//!
//! ```rust
//! use search_upstream_stub::kafka::config::{KafkaConfig, SecurityProtocol};
//!
//! let config = KafkaConfig::default();
//! assert_eq!(config.brokers, "localhost:9092");
//! assert_eq!(config.security_protocol, SecurityProtocol::Plaintext);
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::publish::TopicNames;

/// Security protocol for broker connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityProtocol {
    /// No encryption.
    #[default]
    Plaintext,
    /// TLS encryption, optionally with a client certificate.
    #[serde(alias = "TLS")]
    Ssl,
}

impl SecurityProtocol {
    /// Returns the librdkafka configuration string for this protocol.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plaintext => "PLAINTEXT",
            Self::Ssl => "SSL",
        }
    }
}

impl fmt::Display for SecurityProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityProtocol {
    type Err = String;

    /// Parses a protocol name. `TLS` is accepted for `SSL` and an empty
    /// string means plaintext.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "" | "PLAINTEXT" => Ok(Self::Plaintext),
            "SSL" | "TLS" => Ok(Self::Ssl),
            other => Err(format!("Invalid security protocol: {}", other)),
        }
    }
}

/// TLS certificate settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SslConfig {
    /// Path to the CA certificate bundle.
    #[serde(default)]
    pub ca_certs: Option<String>,
    /// Path to the client certificate (for mTLS).
    #[serde(default)]
    pub client_cert: Option<String>,
    /// Path to the client key (for mTLS).
    #[serde(default)]
    pub client_key: Option<String>,
    /// Skip broker certificate verification.
    #[serde(default)]
    pub skip_verify: bool,
}

/// Kafka producer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KafkaConfig {
    /// Broker addresses (comma-separated).
    #[serde(default = "default_brokers")]
    pub brokers: String,

    /// Topic for legacy Avro content updated events.
    #[serde(default = "default_content_updated_topic")]
    pub content_updated_topic: String,

    /// Topic for search content updated events.
    #[serde(default = "default_search_content_updated_topic")]
    pub search_content_updated_topic: String,

    /// Topic for search content deleted events.
    #[serde(default = "default_search_content_deleted_topic")]
    pub search_content_deleted_topic: String,

    /// Security protocol for the connection.
    #[serde(default)]
    pub security_protocol: SecurityProtocol,

    /// TLS settings, used with [`SecurityProtocol::Ssl`].
    #[serde(default)]
    pub ssl: SslConfig,

    /// Largest message the producer will send, in bytes.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,

    /// Per-message delivery timeout in milliseconds.
    #[serde(default = "default_delivery_timeout_ms")]
    pub delivery_timeout_ms: u64,
}

fn default_brokers() -> String {
    "localhost:9092".to_string()
}

fn default_content_updated_topic() -> String {
    "content-updated".to_string()
}

fn default_search_content_updated_topic() -> String {
    "search-content-updated".to_string()
}

fn default_search_content_deleted_topic() -> String {
    "search-content-deleted".to_string()
}

fn default_max_message_bytes() -> usize {
    2_000_000
}

fn default_delivery_timeout_ms() -> u64 {
    5_000
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: default_brokers(),
            content_updated_topic: default_content_updated_topic(),
            search_content_updated_topic: default_search_content_updated_topic(),
            search_content_deleted_topic: default_search_content_deleted_topic(),
            security_protocol: SecurityProtocol::default(),
            ssl: SslConfig::default(),
            max_message_bytes: default_max_message_bytes(),
            delivery_timeout_ms: default_delivery_timeout_ms(),
        }
    }
}

impl KafkaConfig {
    /// Topic names for the encoder.
    pub fn topic_names(&self) -> TopicNames {
        TopicNames {
            content_updated: self.content_updated_topic.clone(),
            search_content_updated: self.search_content_updated_topic.clone(),
            search_content_deleted: self.search_content_deleted_topic.clone(),
        }
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_millis(self.delivery_timeout_ms)
    }

    /// Returns the producer settings as librdkafka key-value pairs.
    pub fn producer_settings(&self) -> Vec<(String, String)> {
        let mut settings = vec![
            ("bootstrap.servers".to_string(), self.brokers.clone()),
            (
                "message.max.bytes".to_string(),
                self.max_message_bytes.to_string(),
            ),
            (
                "message.timeout.ms".to_string(),
                self.delivery_timeout_ms.to_string(),
            ),
            (
                "client.id".to_string(),
                "search-upstream-stub".to_string(),
            ),
            (
                "security.protocol".to_string(),
                self.security_protocol.as_str().to_string(),
            ),
        ];

        if self.security_protocol == SecurityProtocol::Ssl {
            if let Some(ca) = &self.ssl.ca_certs {
                settings.push(("ssl.ca.location".to_string(), ca.clone()));
            }
            if let Some(cert) = &self.ssl.client_cert {
                settings.push(("ssl.certificate.location".to_string(), cert.clone()));
            }
            if let Some(key) = &self.ssl.client_key {
                settings.push(("ssl.key.location".to_string(), key.clone()));
            }
            if self.ssl.skip_verify {
                settings.push((
                    "enable.ssl.certificate.verification".to_string(),
                    "false".to_string(),
                ));
            }
        }

        settings
    }
}

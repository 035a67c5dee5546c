//! Kafka publishing
//!
//! Configuration for the producer and the [`KafkaSink`] implementation of
//! [`crate::publish::OutboundSink`].
//!
//! # Security
//!
//! - **PLAINTEXT**: no encryption (local development)
//! - **SSL**: TLS, with optional client certificate (`TLS` is accepted as an
//!   alias)

pub mod config;
pub mod producer;

pub use config::{KafkaConfig, SecurityProtocol, SslConfig};
pub use producer::KafkaSink;

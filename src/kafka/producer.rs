//! rdkafka-backed outbound sink
//!
//! Wraps a `FutureProducer`. Each send waits for the broker acknowledgement
//! or the configured delivery timeout; there are no retries beyond what
//! librdkafka does internally.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use tracing::{debug, info};

use super::config::KafkaConfig;
use crate::publish::{OutboundSink, SinkError};

/// Sink sending messages to Kafka.
pub struct KafkaSink {
    producer: FutureProducer,
    brokers: String,
    delivery_timeout: Duration,
}

impl KafkaSink {
    /// Creates the producer.
    ///
    /// Creating the producer does not contact the brokers; call
    /// [`OutboundSink::check`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Unavailable`] if librdkafka rejects the
    /// configuration.
    pub fn new(config: &KafkaConfig) -> Result<Self, SinkError> {
        let mut client_config = ClientConfig::new();
        for (key, value) in config.producer_settings() {
            client_config.set(key, value);
        }

        let producer: FutureProducer = client_config
            .create()
            .map_err(|e| SinkError::Unavailable(format!("failed to create producer: {}", e)))?;

        info!(
            brokers = %config.brokers,
            security_protocol = %config.security_protocol,
            "Created Kafka producer"
        );

        Ok(Self {
            producer,
            brokers: config.brokers.clone(),
            delivery_timeout: config.delivery_timeout(),
        })
    }
}

#[async_trait]
impl OutboundSink for KafkaSink {
    async fn check(&self) -> Result<(), SinkError> {
        let producer = self.producer.clone();
        let timeout = self.delivery_timeout;

        // Metadata fetch is a blocking librdkafka call.
        let metadata = tokio::task::spawn_blocking(move || {
            producer
                .client()
                .fetch_metadata(None, Timeout::After(timeout))
                .map(|m| m.brokers().len())
        })
        .await
        .map_err(|e| SinkError::Unavailable(e.to_string()))?;

        match metadata {
            Ok(broker_count) => {
                debug!(brokers = %self.brokers, broker_count, "Kafka brokers reachable");
                Ok(())
            }
            Err(e) => Err(SinkError::Unavailable(format!(
                "brokers {} unreachable: {}",
                self.brokers, e
            ))),
        }
    }

    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), SinkError> {
        let record = FutureRecord::<(), [u8]>::to(topic).payload(payload.as_slice());

        let (partition, offset) = self
            .producer
            .send(record, Timeout::After(self.delivery_timeout))
            .await
            .map_err(|(e, _)| SinkError::Send {
                topic: topic.to_string(),
                reason: e.to_string(),
            })?;

        debug!(topic = %topic, partition, offset, "Message delivered");
        Ok(())
    }
}

//! Outbound message sinks

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

/// Sink failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The sink cannot accept messages at all.
    #[error("sink unavailable: {0}")]
    Unavailable(String),

    /// One message could not be delivered.
    #[error("failed to send to topic '{topic}': {reason}")]
    Send { topic: String, reason: String },
}

/// Destination accepting `(topic, payload)` pairs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OutboundSink: Send + Sync {
    /// Verifies the sink can accept messages.
    async fn check(&self) -> Result<(), SinkError>;

    /// Sends one payload to `topic`.
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), SinkError>;
}

/// One message captured by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Sink that records messages in memory.
///
/// Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    sent: Mutex<Vec<SentMessage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, in arrival order.
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Messages sent to `topic`.
    pub async fn sent_to(&self, topic: &str) -> Vec<SentMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.topic == topic)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl OutboundSink for MemorySink {
    async fn check(&self) -> Result<(), SinkError> {
        Ok(())
    }

    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), SinkError> {
        tracing::debug!(topic = %topic, bytes = payload.len(), "Recorded message");
        self.sent.lock().await.push(SentMessage {
            topic: topic.to_string(),
            payload,
        });
        Ok(())
    }
}

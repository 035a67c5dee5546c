//! Concurrent batch publishing
//!
//! Every request runs in its own task. Failures are isolated per request and
//! collected into a [`DispatchReport`]; only an unavailable sink aborts the
//! batch, before anything is sent.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::models::{PublishRequest, Resource};
use crate::publish::encoder::{EncodeError, EncodedMessage, Encoder};
use crate::publish::sink::OutboundSink;

/// Batch-level publishing failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The sink failed its readiness check.
    #[error("outbound sink unavailable: {0}")]
    SinkUnavailable(String),
}

/// How resources are turned into messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodeMode {
    /// Each event kind on its own topic and format.
    #[default]
    Event,
    /// Content metadata as Avro search content updated events.
    SearchContentAvro,
}

/// Result of publishing one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
    /// Position of the request in the batch.
    pub index: usize,
    pub resource_type: &'static str,
    pub uri: String,
    /// Target topic; unset when encoding failed before a topic was chosen.
    pub topic: Option<String>,
    pub trace_id: String,
    /// Failure description.
    pub error: Option<String>,
}

impl PublishOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// One entry per request, in request order.
    pub outcomes: Vec<PublishOutcome>,
    pub duration_ms: u64,
}

impl DispatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Encodes and sends batches of resources.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    encoder: Arc<Encoder>,
    mode: EncodeMode,
    max_in_flight: Option<usize>,
}

impl Dispatcher {
    /// Creates an unbounded dispatcher in [`EncodeMode::Event`].
    pub fn new(encoder: Encoder) -> Self {
        Self {
            encoder: Arc::new(encoder),
            mode: EncodeMode::Event,
            max_in_flight: None,
        }
    }

    /// Limits the number of concurrent sends.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = Some(max_in_flight.max(1));
        self
    }

    pub fn with_mode(mut self, mode: EncodeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Publishes every request and waits for all of them.
    ///
    /// Trace ids: a resource's own trace id is kept, else the request's
    /// `trace_id`, else `stub-<unix_millis>-<index>` is generated.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::SinkUnavailable`] if the sink check fails.
    /// Per-request failures are reported in the [`DispatchReport`].
    pub async fn dispatch(
        &self,
        requests: Vec<PublishRequest>,
        sink: Arc<dyn OutboundSink>,
    ) -> Result<DispatchReport, PublishError> {
        sink.check()
            .await
            .map_err(|e| PublishError::SinkUnavailable(e.to_string()))?;

        let start = Instant::now();
        let batch_millis = Utc::now().timestamp_millis();
        let request_count = requests.len();
        let semaphore = self.max_in_flight.map(|n| Arc::new(Semaphore::new(n)));

        info!(
            publish.event = "start",
            publish.request_count = request_count,
            publish.max_in_flight = ?self.max_in_flight,
            "Starting batch publish"
        );

        let mut pending = Vec::with_capacity(request_count);
        let handles: Vec<_> = requests
            .into_iter()
            .enumerate()
            .map(|(index, request)| {
                let fallback = request
                    .trace_id
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| stub_trace_id(batch_millis, index));
                let resource = request.resource.with_trace_id(&fallback);
                let trace_id = resource.trace_id().unwrap_or(&fallback).to_string();

                pending.push(PublishOutcome {
                    index,
                    resource_type: resource.resource_type(),
                    uri: resource.uri().to_string(),
                    topic: request.topic.clone(),
                    trace_id: trace_id.clone(),
                    error: None,
                });

                let task = PublishTask {
                    index,
                    resource,
                    topic_override: request.topic,
                    trace_id,
                    encoder: Arc::clone(&self.encoder),
                    mode: self.mode,
                    sink: Arc::clone(&sink),
                    semaphore: semaphore.clone(),
                };
                tokio::spawn(task.run())
            })
            .collect();

        let mut outcomes = Vec::with_capacity(request_count);
        for (joined, mut placeholder) in join_all(handles).await.into_iter().zip(pending) {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    warn!(
                        publish.event = "task_panic",
                        publish.index = placeholder.index,
                        uri = %placeholder.uri,
                        error = %e,
                        "Publish task panicked"
                    );
                    placeholder.error = Some(format!("publish task failed: {}", e));
                    outcomes.push(placeholder);
                }
            }
        }

        let report = DispatchReport {
            outcomes,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            publish.event = "complete",
            publish.succeeded = report.succeeded(),
            publish.failed = report.failed(),
            publish.duration_ms = report.duration_ms,
            "Batch publish finished"
        );
        Ok(report)
    }
}

/// Trace id of the form `stub-<unix_millis>-<index>`.
pub fn stub_trace_id(unix_millis: i64, index: usize) -> String {
    format!("stub-{}-{}", unix_millis, index)
}

struct PublishTask {
    index: usize,
    resource: Resource,
    topic_override: Option<String>,
    trace_id: String,
    encoder: Arc<Encoder>,
    mode: EncodeMode,
    sink: Arc<dyn OutboundSink>,
    semaphore: Option<Arc<Semaphore>>,
}

impl PublishTask {
    async fn run(self) -> PublishOutcome {
        let mut outcome = PublishOutcome {
            index: self.index,
            resource_type: self.resource.resource_type(),
            uri: self.resource.uri().to_string(),
            topic: self.topic_override.clone(),
            trace_id: self.trace_id.clone(),
            error: None,
        };

        let _permit = match &self.semaphore {
            Some(sem) => match Arc::clone(sem).acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(e) => {
                    outcome.error = Some(format!("publish slot unavailable: {}", e));
                    return self.failed(outcome);
                }
            },
            None => None,
        };

        let message = match self.encode() {
            Ok(message) => message,
            Err(e) => {
                outcome.error = Some(e.to_string());
                return self.failed(outcome);
            }
        };

        let topic = self.topic_override.clone().unwrap_or(message.topic);
        outcome.topic = Some(topic.clone());

        match self.sink.send(&topic, message.payload).await {
            Ok(()) => {
                debug!(
                    index = self.index,
                    uri = %outcome.uri,
                    topic = %topic,
                    trace_id = %self.trace_id,
                    event_type = %message.event_type,
                    "Published resource"
                );
                outcome
            }
            Err(e) => {
                outcome.error = Some(e.to_string());
                self.failed(outcome)
            }
        }
    }

    fn encode(&self) -> Result<EncodedMessage, EncodeError> {
        match self.mode {
            EncodeMode::Event => self.encoder.encode(&self.resource),
            EncodeMode::SearchContentAvro => {
                self.encoder.encode_search_content_avro(&self.resource)
            }
        }
    }

    fn failed(&self, outcome: PublishOutcome) -> PublishOutcome {
        warn!(
            index = outcome.index,
            uri = %outcome.uri,
            resource_type = outcome.resource_type,
            topic = outcome.topic.as_deref().unwrap_or(""),
            trace_id = %outcome.trace_id,
            error = outcome.error.as_deref().unwrap_or(""),
            "Failed to publish resource"
        );
        outcome
    }
}

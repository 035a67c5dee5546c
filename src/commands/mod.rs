/*!
Command handlers for the CLI

- `serve`: HTTP listing API
- `produce`: interactive single-message publisher
- `load_test`: concurrent batch publisher
- `publish_dir`: republish a fixture directory as Avro events

Publishing commands share [`SinkHandle`], which is either a Kafka producer
or, with `--dry-run`, an in-memory recorder.
*/

pub mod load_test;
pub mod produce;
pub mod publish_dir;
pub mod serve;

use std::collections::BTreeMap;
use std::sync::Arc;

use colored::Colorize;

use crate::config::Config;
use crate::error::Result;
use crate::kafka::KafkaSink;
use crate::publish::{DispatchReport, Dispatcher, EncodeMode, Encoder, MemorySink, OutboundSink};

/// Sink chosen for a publishing command.
pub struct SinkHandle {
    sink: Arc<dyn OutboundSink>,
    memory: Option<Arc<MemorySink>>,
}

impl SinkHandle {
    /// Kafka sink, or an in-memory sink when `dry_run` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the Kafka producer cannot be created.
    pub fn from_config(config: &Config, dry_run: bool) -> Result<Self> {
        if dry_run {
            tracing::info!("Dry run: messages are recorded in memory only");
            let memory = Arc::new(MemorySink::new());
            return Ok(Self {
                sink: memory.clone(),
                memory: Some(memory),
            });
        }

        let sink = KafkaSink::new(&config.kafka)?;
        Ok(Self {
            sink: Arc::new(sink),
            memory: None,
        })
    }

    pub fn sink(&self) -> Arc<dyn OutboundSink> {
        self.sink.clone()
    }

    /// In-memory sink, set for dry runs.
    pub fn memory(&self) -> Option<&Arc<MemorySink>> {
        self.memory.as_ref()
    }

    /// Prints per-topic message counts recorded by a dry run.
    pub async fn print_dry_run_summary(&self) {
        let Some(memory) = &self.memory else {
            return;
        };

        let mut per_topic: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for message in memory.sent().await {
            let entry = per_topic.entry(message.topic).or_default();
            entry.0 += 1;
            entry.1 += message.payload.len();
        }

        println!("{}", "Dry run, nothing sent to Kafka:".yellow());
        for (topic, (count, bytes)) in per_topic {
            println!("  {}: {} message(s), {} bytes", topic.cyan(), count, bytes);
        }
    }
}

/// Dispatcher configured from `config`.
///
/// # Errors
///
/// Returns an error if the Avro schemas fail to parse.
pub fn build_dispatcher(config: &Config, mode: EncodeMode) -> Result<Dispatcher> {
    let encoder = Encoder::new(config.kafka.topic_names())?;
    Ok(Dispatcher::new(encoder)
        .with_max_in_flight(config.publish.max_in_flight)
        .with_mode(mode))
}

/// Prints a one-line summary plus each failure.
pub fn print_report(report: &DispatchReport) {
    let summary = format!(
        "Published {} of {} message(s) in {} ms",
        report.succeeded(),
        report.outcomes.len(),
        report.duration_ms
    );
    if report.failed() == 0 {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.yellow());
    }

    for outcome in report.outcomes.iter().filter(|o| !o.is_success()) {
        println!(
            "  {} [{}] {} {} ({})",
            "failed".red(),
            outcome.index,
            outcome.resource_type,
            outcome.uri,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
}

//! `produce` command: pick a topic and a resource, publish one message.
//!
//! Selections are 1-based, matching the printed menus. Ctrl-C or Ctrl-D at a
//! prompt cancels without publishing. With `avro`, a search content updated
//! resource is sent as an Avro event instead of JSON.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::{build_dispatcher, print_report, SinkHandle};
use crate::catalog::Catalog;
use crate::cli::TopicChoice;
use crate::config::Config;
use crate::error::Result;
use crate::models::{PublishRequest, Resource};
use crate::publish::EncodeMode;

/// Runs the produce flow; `topic` and `index` skip their prompts.
///
/// # Errors
///
/// Returns an error for an out-of-range `index`, `avro` with a topic other
/// than search-content-updated, an unavailable sink, or a failed send.
pub async fn run_produce(
    config: &Config,
    topic: Option<TopicChoice>,
    index: Option<usize>,
    avro: bool,
    dry_run: bool,
) -> Result<()> {
    let catalog = Catalog::load_embedded()?;
    let mut prompter = Prompter::default();

    let topic = match (topic, avro) {
        (Some(topic), true) if topic != TopicChoice::SearchContentUpdated => {
            anyhow::bail!("--avro only applies to the search-content-updated topic");
        }
        (Some(topic), _) => topic,
        (None, true) => TopicChoice::SearchContentUpdated,
        (None, false) => match prompter.select_topic()? {
            Some(topic) => topic,
            None => return Ok(()),
        },
    };
    let mode = if avro {
        EncodeMode::SearchContentAvro
    } else {
        EncodeMode::Event
    };

    let resources = catalog.resources_of(topic.kind());
    if resources.is_empty() {
        anyhow::bail!("no {} resources available", topic.kind());
    }

    let position = match index {
        Some(index) => parse_selection(&index.to_string(), resources.len()).ok_or_else(|| {
            anyhow::anyhow!(
                "resource index {} out of range (1-{})",
                index,
                resources.len()
            )
        })?,
        None => {
            print_resources(resources);
            match prompter.select_resource(resources.len())? {
                Some(position) => position,
                None => return Ok(()),
            }
        }
    };

    let resource = resources[position].clone();
    tracing::info!(
        topic = topic.label(),
        resource_type = resource.resource_type(),
        uri = %resource.uri(),
        avro,
        "Publishing selected resource"
    );

    let handle = SinkHandle::from_config(config, dry_run)?;
    let dispatcher = build_dispatcher(config, mode)?;
    let report = dispatcher
        .dispatch(vec![PublishRequest::new(resource)], handle.sink())
        .await?;

    print_report(&report);
    handle.print_dry_run_summary().await;

    if report.failed() > 0 {
        anyhow::bail!("failed to publish message");
    }
    Ok(())
}

/// Parses a 1-based menu selection into a 0-based position.
pub fn parse_selection(input: &str, count: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= count => Some(n - 1),
        _ => None,
    }
}

fn print_resources(resources: &[Resource]) {
    println!("{}", "Available resources:".bold());
    for (i, resource) in resources.iter().enumerate() {
        println!("[{}] {}", i + 1, resource.summary_line());
    }
}

#[derive(Default)]
struct Prompter {
    editor: Option<DefaultEditor>,
}

impl Prompter {
    fn select_topic(&mut self) -> Result<Option<TopicChoice>> {
        println!("{}", "Select the Kafka topic to send messages to:".bold());
        for (i, topic) in TopicChoice::ALL.iter().enumerate() {
            println!("{}) {}", i + 1, topic.label());
        }

        let prompt = format!("Enter choice (1-{}): ", TopicChoice::ALL.len());
        Ok(self
            .select(&prompt, TopicChoice::ALL.len())?
            .map(|position| TopicChoice::ALL[position]))
    }

    fn select_resource(&mut self, count: usize) -> Result<Option<usize>> {
        self.select("Enter the number of the resource to send: ", count)
    }

    /// Prompts until a valid selection is entered.
    fn select(&mut self, prompt: &str, count: usize) -> Result<Option<usize>> {
        loop {
            let Some(line) = self.readline(prompt)? else {
                return Ok(None);
            };
            match parse_selection(&line, count) {
                Some(position) => return Ok(Some(position)),
                None => println!("{}", "Invalid selection. Please try again.".red()),
            }
        }
    }

    fn readline(&mut self, prompt: &str) -> Result<Option<String>> {
        if self.editor.is_none() {
            self.editor = Some(DefaultEditor::new()?);
        }
        let Some(editor) = self.editor.as_mut() else {
            return Ok(None);
        };

        match editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Cancelled");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

//! Command-line interface definition for the upstream stub
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for serving the listing API and publishing messages.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::ResourceKind;

/// Stub upstream content service for search indexing
///
/// Serves paginated resource listings from embedded fixtures and publishes
/// the same records as Kafka messages.
#[derive(Parser, Debug, Clone)]
#[command(name = "upstream-stub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP listing API
    Serve {
        /// Address to bind, overriding configuration
        #[arg(short, long)]
        bind_addr: Option<String>,
    },

    /// Publish one message, choosing topic and resource interactively
    Produce {
        /// Topic to publish to (skips the topic prompt)
        #[arg(short, long, value_enum)]
        topic: Option<TopicChoice>,

        /// 1-based position of the resource to send (skips the resource prompt)
        #[arg(short, long)]
        index: Option<usize>,

        /// Send a search-content-updated resource as an Avro event
        /// instead of JSON (implies the search-content-updated topic)
        #[arg(long)]
        avro: bool,

        /// Record messages in memory instead of sending to Kafka
        #[arg(long)]
        dry_run: bool,
    },

    /// Publish a batch of messages across all topics concurrently
    LoadTest {
        /// Number of content-updated messages
        #[arg(long, default_value_t = 1)]
        num_content_updated: usize,

        /// Number of search-content-updated messages
        #[arg(long, default_value_t = 1)]
        num_search_content_updated: usize,

        /// Number of search-content-deleted messages
        #[arg(long, default_value_t = 1)]
        num_search_content_deleted: usize,

        /// Record messages in memory instead of sending to Kafka
        #[arg(long)]
        dry_run: bool,
    },

    /// Publish every listing fixture in a directory as Avro
    /// search-content-updated events
    PublishDir {
        /// Directory laid out as `<kind>/<name>.json`
        dir: PathBuf,

        /// Record messages in memory instead of sending to Kafka
        #[arg(long)]
        dry_run: bool,
    },
}

/// Topic choices for `produce`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicChoice {
    /// Legacy Avro content updated events
    ContentUpdated,
    /// JSON search content updated events
    SearchContentUpdated,
    /// JSON search content deleted events
    SearchContentDeleted,
}

impl TopicChoice {
    /// All choices, in menu order.
    pub const ALL: [TopicChoice; 3] = [
        TopicChoice::ContentUpdated,
        TopicChoice::SearchContentUpdated,
        TopicChoice::SearchContentDeleted,
    ];

    /// Resource kind published on this topic.
    pub fn kind(self) -> ResourceKind {
        match self {
            TopicChoice::ContentUpdated => ResourceKind::ContentUpdated,
            TopicChoice::SearchContentUpdated => ResourceKind::SearchContentUpdated,
            TopicChoice::SearchContentDeleted => ResourceKind::SearchContentDeleted,
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            TopicChoice::ContentUpdated => "content-updated (legacy)",
            TopicChoice::SearchContentUpdated => "search-content-updated (new)",
            TopicChoice::SearchContentDeleted => "search-content-deleted (new)",
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Serve { bind_addr: None },
        }
    }
}

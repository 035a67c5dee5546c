//! Configuration management for the upstream stub
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, StubError};
use crate::kafka::KafkaConfig;
use crate::logging::LoggingConfig;
use crate::pagination::Paginator;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure
///
/// Built once at startup and passed to the commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP API binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Seconds to wait for in-flight requests on shutdown
    #[serde(default = "default_graceful_shutdown_timeout_secs")]
    pub graceful_shutdown_timeout_secs: u64,

    /// Listing pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Kafka producer settings
    #[serde(default)]
    pub kafka: KafkaConfig,

    /// Batch publishing settings
    #[serde(default)]
    pub publish: PublishConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_bind_addr() -> String {
    "0.0.0.0:29600".to_string()
}

fn default_graceful_shutdown_timeout_secs() -> u64 {
    5
}

/// Pagination configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Limit used when a request omits one
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Offset used when a request omits one
    #[serde(default)]
    pub default_offset: usize,

    /// Largest limit a request may ask for
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

fn default_limit() -> usize {
    20
}

fn default_max_limit() -> usize {
    1000
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            default_offset: 0,
            max_limit: default_max_limit(),
        }
    }
}

impl PaginationConfig {
    /// Paginator built from these settings
    pub fn paginator(&self) -> Paginator {
        Paginator::new(self.default_limit, self.default_offset, self.max_limit)
    }
}

/// Batch publishing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Maximum concurrent sends in one batch
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

fn default_max_in_flight() -> usize {
    16
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed, or if
    /// an environment variable holds a value of the wrong type
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars()?;
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| StubError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| StubError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) -> Result<()> {
        if let Ok(bind_addr) = std::env::var("BIND_ADDR") {
            self.bind_addr = bind_addr;
        }
        if let Ok(raw) = std::env::var("GRACEFUL_SHUTDOWN_TIMEOUT") {
            let timeout = parse_duration(&raw).map_err(|e| {
                StubError::Config(format!("Invalid GRACEFUL_SHUTDOWN_TIMEOUT '{}': {}", raw, e))
            })?;
            // Whole seconds, rounding sub-second remainders up.
            self.graceful_shutdown_timeout_secs =
                timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        }

        // Pagination overrides
        env_parse("DEFAULT_LIMIT", &mut self.pagination.default_limit)?;
        env_parse("DEFAULT_OFFSET", &mut self.pagination.default_offset)?;
        env_parse("DEFAULT_MAXIMUM_LIMIT", &mut self.pagination.max_limit)?;

        // Kafka overrides
        if let Ok(brokers) = std::env::var("KAFKA_ADDR") {
            self.kafka.brokers = brokers;
        }
        if let Ok(topic) = std::env::var("KAFKA_CONTENT_UPDATED_TOPIC") {
            self.kafka.content_updated_topic = topic;
        }
        if let Ok(topic) = std::env::var("KAFKA_SEARCH_CONTENT_UPDATED_TOPIC") {
            self.kafka.search_content_updated_topic = topic;
        }
        if let Ok(topic) = std::env::var("KAFKA_SEARCH_CONTENT_DELETED_TOPIC") {
            self.kafka.search_content_deleted_topic = topic;
        }
        env_parse("KAFKA_SEC_PROTO", &mut self.kafka.security_protocol)?;
        if let Ok(ca) = std::env::var("KAFKA_SEC_CA_CERTS") {
            self.kafka.ssl.ca_certs = Some(ca);
        }
        if let Ok(cert) = std::env::var("KAFKA_SEC_CLIENT_CERT") {
            self.kafka.ssl.client_cert = Some(cert);
        }
        if let Ok(key) = std::env::var("KAFKA_SEC_CLIENT_KEY") {
            self.kafka.ssl.client_key = Some(key);
        }
        env_parse("KAFKA_SEC_SKIP_VERIFY", &mut self.kafka.ssl.skip_verify)?;
        env_parse("KAFKA_MAX_BYTES", &mut self.kafka.max_message_bytes)?;
        env_parse(
            "KAFKA_DELIVERY_TIMEOUT_MS",
            &mut self.kafka.delivery_timeout_ms,
        )?;

        env_parse("PUBLISH_MAX_IN_FLIGHT", &mut self.publish.max_in_flight)?;

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        env_parse("LOG_JSON", &mut self.logging.json_format)?;

        Ok(())
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            self.logging.level = "debug".to_string();
        }
        if let crate::cli::Commands::Serve {
            bind_addr: Some(bind_addr),
        } = &cli.command
        {
            self.bind_addr = bind_addr.clone();
        }
    }

    /// Shutdown grace period
    pub fn graceful_shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.graceful_shutdown_timeout_secs)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(StubError::Config("bind_addr cannot be empty".to_string()).into());
        }

        if self.pagination.max_limit == 0 {
            return Err(StubError::Config(
                "pagination.max_limit must be greater than 0".to_string(),
            )
            .into());
        }

        if self.pagination.default_limit > self.pagination.max_limit {
            return Err(StubError::Config(format!(
                "pagination.default_limit ({}) must not exceed pagination.max_limit ({})",
                self.pagination.default_limit, self.pagination.max_limit
            ))
            .into());
        }

        if self.kafka.brokers.trim().is_empty() {
            return Err(StubError::Config("kafka.brokers cannot be empty".to_string()).into());
        }

        let topics = [
            ("kafka.content_updated_topic", &self.kafka.content_updated_topic),
            (
                "kafka.search_content_updated_topic",
                &self.kafka.search_content_updated_topic,
            ),
            (
                "kafka.search_content_deleted_topic",
                &self.kafka.search_content_deleted_topic,
            ),
        ];
        for (name, topic) in topics {
            if topic.trim().is_empty() {
                return Err(StubError::Config(format!("{} cannot be empty", name)).into());
            }
        }

        if self.publish.max_in_flight == 0 {
            return Err(StubError::Config(
                "publish.max_in_flight must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            graceful_shutdown_timeout_secs: default_graceful_shutdown_timeout_secs(),
            pagination: PaginationConfig::default(),
            kafka: KafkaConfig::default(),
            publish: PublishConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Overwrites `target` with the parsed value of `name`, if set.
fn env_parse<T>(name: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(raw) = std::env::var(name) {
        *target = raw
            .parse()
            .map_err(|e| StubError::Config(format!("Invalid {} '{}': {}", name, raw, e)))?;
    }
    Ok(())
}

/// Parses a duration such as `5s`, `500ms`, `1m30s` or `1.5h`.
///
/// A bare number is taken as seconds.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let unit_start = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("missing unit in duration '{}'", s))?;
        let (value_str, tail) = rest.split_at(unit_start);
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);

        let value: f64 = value_str
            .parse()
            .map_err(|_| format!("invalid duration '{}'", s))?;
        let unit_nanos = match unit {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return Err(format!("unknown unit '{}' in duration '{}'", unit, s)),
        };
        total += Duration::from_nanos((value * unit_nanos).round() as u64);
        rest = next;
    }

    Ok(total)
}

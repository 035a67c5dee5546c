//! Structured logging setup
//!
//! Provides JSON-formatted and human-readable logging with optional file output.
//! `RUST_LOG` takes precedence over the configured level.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `search_upstream_stub=debug`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_format: bool,

    /// Also append logs to this file
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            file_path: None,
        }
    }
}

/// Initialize logging based on configuration.
///
/// # Errors
///
/// Returns an error if the level is not a valid filter directive, the log
/// file cannot be opened, or a global subscriber is already installed.
///
/// # Examples
///
/// ```no_run
/// use search_upstream_stub::logging::{init_logging, LoggingConfig};
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     json_format: true,
///     file_path: None,
/// };
///
/// init_logging(&config).unwrap();
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json_format {
        let stdout_layer = fmt::layer().json().with_current_span(true);

        if let Some(file_path) = &config.file_path {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;

            let file_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(Arc::new(file));

            registry.with(stdout_layer).with(file_layer).try_init()?;
        } else {
            registry.with(stdout_layer).try_init()?;
        }
    } else {
        let stdout_layer = fmt::layer().with_target(true).with_level(true);

        if let Some(file_path) = &config.file_path {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;

            let file_layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_writer(Arc::new(file));

            registry.with(stdout_layer).with(file_layer).try_init()?;
        } else {
            registry.with(stdout_layer).try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
        assert_eq!(config.file_path, None);
    }

    #[test]
    fn test_logging_config_from_yaml() {
        let yaml = "level: debug\njson_format: true\nfile_path: /tmp/stub.log\n";
        let config: LoggingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.level, "debug");
        assert!(config.json_format);
        assert_eq!(config.file_path, Some(PathBuf::from("/tmp/stub.log")));
    }

    #[test]
    fn test_logging_config_partial_yaml_uses_defaults() {
        let config: LoggingConfig = serde_yaml::from_str("json_format: true\n").unwrap();
        assert_eq!(config.level, "info");
        assert!(config.json_format);
    }
}

//! Search upstream stub
//!
#![doc = "Search upstream stub"]
#![doc = "Main entry point for the upstream-stub binary."]

use anyhow::Result;

use search_upstream_stub::cli::{Cli, Commands};
use search_upstream_stub::commands;
use search_upstream_stub::commands::load_test::LoadTestCounts;
use search_upstream_stub::config::Config;
use search_upstream_stub::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load and validate configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    init_logging(&config.logging)?;

    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!("Starting listing API");
            commands::serve::run_serve(&config).await?;
            Ok(())
        }
        Commands::Produce {
            topic,
            index,
            avro,
            dry_run,
        } => {
            tracing::info!("Starting interactive producer");
            commands::produce::run_produce(&config, topic, index, avro, dry_run).await?;
            Ok(())
        }
        Commands::LoadTest {
            num_content_updated,
            num_search_content_updated,
            num_search_content_deleted,
            dry_run,
        } => {
            tracing::info!("Starting load test");
            let counts = LoadTestCounts {
                content_updated: num_content_updated,
                search_content_updated: num_search_content_updated,
                search_content_deleted: num_search_content_deleted,
            };
            let report = commands::load_test::run_load_test(&config, counts, dry_run).await?;
            if report.failed() > 0 {
                anyhow::bail!(
                    "{} of {} messages failed to publish",
                    report.failed(),
                    report.outcomes.len()
                );
            }
            Ok(())
        }
        Commands::PublishDir { dir, dry_run } => {
            tracing::info!(dir = %dir.display(), "Publishing fixture directory");
            let report = commands::publish_dir::run_publish_dir(&config, &dir, dry_run).await?;
            if report.failed() > 0 {
                anyhow::bail!(
                    "{} of {} messages failed to publish",
                    report.failed(),
                    report.outcomes.len()
                );
            }
            Ok(())
        }
    }
}

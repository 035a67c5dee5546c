//! `publish-dir` command: republish listing fixtures from disk.
//!
//! Every `Standard` and `Release` file under the directory becomes an Avro
//! search content updated event. Event fixtures in the same tree are
//! ignored.

use std::path::Path;

use super::{build_dispatcher, print_report, SinkHandle};
use crate::catalog::fixtures::{parse_fixture, read_fixture_dir};
use crate::config::Config;
use crate::error::Result;
use crate::models::{PublishRequest, Resource};
use crate::publish::{DispatchReport, EncodeMode};

/// Loads listing resources from `dir`, skipping files that fail to parse.
pub fn load_listing_resources(dir: &Path) -> Vec<Resource> {
    let mut resources = Vec::new();

    for (path, bytes) in read_fixture_dir(dir) {
        tracing::info!(file = %path, "Processing file");
        match parse_fixture(&path, &bytes) {
            Ok(resource) if resource.kind().is_listing() => resources.push(resource),
            Ok(resource) => {
                tracing::debug!(
                    file = %path,
                    resource_type = resource.resource_type(),
                    "Skipping non-listing resource"
                );
            }
            Err(e) => tracing::error!(error = %e, "Skipping fixture"),
        }
    }

    resources
}

/// Publishes every listing resource under `dir`.
///
/// # Errors
///
/// Returns an error if `dir` is not a directory or the sink is
/// unavailable.
pub async fn run_publish_dir(config: &Config, dir: &Path, dry_run: bool) -> Result<DispatchReport> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let resources = load_listing_resources(dir);
    if resources.is_empty() {
        println!("No listing resources found in {}", dir.display());
        return Ok(DispatchReport::default());
    }
    tracing::info!(
        dir = %dir.display(),
        resources = resources.len(),
        "Parsed listing resources"
    );

    let requests = resources.into_iter().map(PublishRequest::new).collect();
    let handle = SinkHandle::from_config(config, dry_run)?;
    let dispatcher = build_dispatcher(config, EncodeMode::SearchContentAvro)?;
    let report = dispatcher.dispatch(requests, handle.sink()).await?;

    print_report(&report);
    handle.print_dry_run_summary().await;
    tracing::info!("Completed processing all JSON files");
    Ok(report)
}

//! `load-test` command: publish many messages across all topics at once.

use super::{build_dispatcher, print_report, SinkHandle};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Result;
use crate::models::ResourceKind;
use crate::publish::{plan_batch, DispatchReport, EncodeMode};

/// Requested message count per topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadTestCounts {
    pub content_updated: usize,
    pub search_content_updated: usize,
    pub search_content_deleted: usize,
}

impl LoadTestCounts {
    /// Counts keyed by the resource kind feeding each topic.
    pub fn by_kind(&self) -> [(ResourceKind, usize); 3] {
        [
            (ResourceKind::ContentUpdated, self.content_updated),
            (ResourceKind::SearchContentUpdated, self.search_content_updated),
            (ResourceKind::SearchContentDeleted, self.search_content_deleted),
        ]
    }

    pub fn total(&self) -> usize {
        self.content_updated + self.search_content_updated + self.search_content_deleted
    }
}

/// Publishes the requested batch and returns the report.
///
/// Per-message failures are reported, not returned as errors.
///
/// # Errors
///
/// Returns an error if the catalog fails to load or the sink is unavailable.
pub async fn run_load_test(
    config: &Config,
    counts: LoadTestCounts,
    dry_run: bool,
) -> Result<DispatchReport> {
    let catalog = Catalog::load_embedded()?;
    let requests = plan_batch(&catalog, &counts.by_kind());
    if requests.is_empty() {
        println!("Nothing to publish; pass --num-content-updated, --num-search-content-updated or --num-search-content-deleted");
        return Ok(DispatchReport::default());
    }

    tracing::info!(
        requested = counts.total(),
        planned = requests.len(),
        max_in_flight = config.publish.max_in_flight,
        "Starting load test"
    );

    let handle = SinkHandle::from_config(config, dry_run)?;
    let dispatcher = build_dispatcher(config, EncodeMode::Event)?;
    let report = dispatcher.dispatch(requests, handle.sink()).await?;

    print_report(&report);
    handle.print_dry_run_summary().await;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_test_dry_run_publishes_every_request() {
        let counts = LoadTestCounts {
            content_updated: 3,
            search_content_updated: 2,
            search_content_deleted: 1,
        };
        let report = run_load_test(&Config::default(), counts, true)
            .await
            .unwrap();
        assert_eq!(report.outcomes.len(), 6);
        assert_eq!(report.failed(), 0);
    }

    #[tokio::test]
    async fn test_load_test_with_no_counts_is_empty() {
        let report = run_load_test(&Config::default(), LoadTestCounts::default(), true)
            .await
            .unwrap();
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_counts_total() {
        let counts = LoadTestCounts {
            content_updated: 1,
            search_content_updated: 2,
            search_content_deleted: 3,
        };
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.by_kind()[1], (ResourceKind::SearchContentUpdated, 2));
    }
}

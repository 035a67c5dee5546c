//! `serve` command: run the listing API until Ctrl-C.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::api::{router, AppState};
use crate::catalog::{Catalog, DataStore};
use crate::config::Config;
use crate::error::Result;
use crate::pagination::Paginator;

/// Loads the embedded catalog and serves it on `config.bind_addr`.
///
/// On Ctrl-C in-flight requests get `graceful_shutdown_timeout_secs` to
/// finish.
///
/// # Errors
///
/// Returns an error if the catalog fails to load, the address cannot be
/// bound, or shutdown does not complete in time.
pub async fn run_serve(config: &Config) -> Result<()> {
    let catalog = Catalog::load_embedded()?;
    info!(resources = catalog.len(), "Loaded resource catalog");
    let store: Arc<dyn DataStore> = Arc::new(catalog);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(bind_addr = %config.bind_addr, "Starting HTTP server");

    let shutdown = Arc::new(Notify::new());
    let signal = shutdown.clone();
    let mut server = tokio::spawn(serve(
        listener,
        store,
        config.pagination.paginator(),
        async move { signal.notified().await },
    ));

    tokio::select! {
        joined = &mut server => return joined?,
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutdown signal received");
        }
    }

    shutdown.notify_one();
    let grace = config.graceful_shutdown_timeout();
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => {
            joined??;
            info!("Graceful shutdown complete");
            Ok(())
        }
        Err(_) => {
            warn!(timeout_secs = grace.as_secs(), "Graceful shutdown timed out");
            Err(anyhow::anyhow!("graceful shutdown timed out after {:?}", grace))
        }
    }
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    store: Arc<dyn DataStore>,
    paginator: Paginator,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(AppState::new(store, paginator));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

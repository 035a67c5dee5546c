//! HTTP API
//!
//! - `GET /resources?offset=&limit=`: paginated listing
//! - `GET /health`: liveness and version

pub mod health;
pub mod resources;

use std::sync::Arc;
use std::time::Instant;

use axum::{routing::get, Router};

use crate::catalog::DataStore;
use crate::pagination::Paginator;

pub use health::HealthResponse;
pub use resources::{ApiError, INTERNAL_ERROR_BODY};

/// Path of the listing endpoint.
pub const RESOURCES_PATH: &str = "/resources";

/// Path of the health endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    pub paginator: Paginator,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn DataStore>, paginator: Paginator) -> Self {
        Self {
            store,
            paginator,
            started_at: Instant::now(),
        }
    }
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(RESOURCES_PATH, get(resources::list_resources))
        .route(HEALTH_PATH, get(health::health_handler))
        .with_state(state)
}

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use search_upstream_stub::api::{router, AppState};
use search_upstream_stub::catalog::{Catalog, DataStore, ListOptions};
use search_upstream_stub::models::{Resource, ResourceKind, Resources, StandardResource};
use search_upstream_stub::pagination::Paginator;
use search_upstream_stub::StubError;
use tempfile::TempDir;
use tower::ServiceExt;

/// Standard resource with the given uri and title.
#[allow(dead_code)]
pub fn standard(uri: &str, title: &str) -> Resource {
    Resource::Standard(StandardResource {
        uri: uri.to_string(),
        title: title.to_string(),
        ..Default::default()
    })
}

/// Catalog holding two standard resources, `/first` then `/second`.
#[allow(dead_code)]
pub fn two_resource_catalog() -> Catalog {
    Catalog::from_resources(vec![
        standard("/first", "First"),
        standard("/second", "Second"),
    ])
}

/// Router over `store` with the default paginator.
#[allow(dead_code)]
pub fn app(store: Arc<dyn DataStore>) -> Router {
    router(AppState::new(store, Paginator::default()))
}

/// Sends a GET through the router and returns status and body text.
#[allow(dead_code)]
pub async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("router failed");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    (
        status,
        String::from_utf8(body.to_vec()).expect("body is not utf-8"),
    )
}

/// Data store that always fails.
#[allow(dead_code)]
pub struct FailingStore;

#[async_trait]
impl DataStore for FailingStore {
    async fn get_resources(&self, _options: ListOptions) -> Result<Resources, StubError> {
        Err(StubError::Config("data store offline".to_string()))
    }

    async fn get_resources_with_type(
        &self,
        _kind: ResourceKind,
        _options: ListOptions,
    ) -> Result<Resources, StubError> {
        Err(StubError::Config("data store offline".to_string()))
    }
}

/// Writes `files` (relative path, contents) under a new temp directory.
#[allow(dead_code)]
pub fn fixture_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("failed to create tempdir");
    for (rel, body) in files {
        write_file(dir.path(), rel, body);
    }
    dir
}

#[allow(dead_code)]
pub fn write_file(root: &Path, rel: &str, body: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create fixture dir");
    }
    fs::write(&path, body).expect("failed to write fixture");
    path
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

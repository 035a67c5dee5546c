//! `GET /resources` listing handler

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::AppState;
use crate::catalog::ListOptions;
use crate::pagination::{PaginationError, PARAM_LIMIT, PARAM_OFFSET};

/// Body returned for unexpected failures.
pub const INTERNAL_ERROR_BODY: &str = "internal server error";

/// Listing handler failures.
#[derive(Debug)]
pub enum ApiError {
    /// Bad query parameters; the message is returned to the caller.
    BadRequest(PaginationError),
    /// Data store failure; details are only logged.
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            ApiError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
            }
        }
    }
}

impl From<PaginationError> for ApiError {
    fn from(e: PaginationError) -> Self {
        ApiError::BadRequest(e)
    }
}

/// Lists resources with `offset` and `limit` pagination.
///
/// A repeated parameter uses its first value.
pub async fn list_resources(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let offset_param = first_value(&params, PARAM_OFFSET);
    let limit_param = first_value(&params, PARAM_LIMIT);

    let (offset, limit) = state
        .paginator
        .validate_optional(offset_param, limit_param)
        .map_err(|e| {
            tracing::warn!(
                offset = offset_param.unwrap_or(""),
                limit = limit_param.unwrap_or(""),
                error = %e,
                "Rejected listing request"
            );
            ApiError::from(e)
        })?;

    let resources = state
        .store
        .get_resources(ListOptions::new(offset, limit))
        .await
        .map_err(|e| {
            tracing::error!(offset, limit, error = %e, "Failed to get resources");
            ApiError::Internal
        })?;

    tracing::info!(
        offset,
        limit,
        count = resources.count,
        total_count = resources.total_count,
        "Listed resources"
    );
    Ok(Json(resources).into_response())
}

fn first_value<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockDataStore;
    use crate::error::StubError;
    use crate::models::Resources;
    use crate::pagination::Paginator;
    use axum::{body::Body, http::Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn get(state: AppState, uri: &str) -> (StatusCode, String) {
        let response = super::super::router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_store_receives_validated_options() {
        let mut store = MockDataStore::new();
        store
            .expect_get_resources()
            .withf(|options| *options == ListOptions::new(3, 7))
            .times(1)
            .returning(|options| Ok(Resources::new(Vec::new(), options.offset, options.limit, 0)));
        let state = AppState::new(Arc::new(store), Paginator::default());

        let (status, body) = get(state, "/resources?offset=3&limit=7").await;

        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["offset"], 3);
        assert_eq!(value["limit"], 7);
    }

    #[tokio::test]
    async fn test_store_not_called_on_invalid_params() {
        let mut store = MockDataStore::new();
        store.expect_get_resources().never();
        let state = AppState::new(Arc::new(store), Paginator::default());

        let (status, body) = get(state, "/resources?limit=abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "invalid limit query parameter");
    }

    #[tokio::test]
    async fn test_repeated_params_use_first_value() {
        let mut store = MockDataStore::new();
        store
            .expect_get_resources()
            .withf(|options| *options == ListOptions::new(2, 5))
            .times(1)
            .returning(|options| Ok(Resources::new(Vec::new(), options.offset, options.limit, 0)));
        let state = AppState::new(Arc::new(store), Paginator::default());

        let (status, body) = get(state, "/resources?limit=5&limit=x&offset=2&offset=-1").await;

        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["limit"], 5);
        assert_eq!(value["offset"], 2);
    }

    #[test]
    fn test_first_value() {
        let params = vec![
            ("limit".to_string(), "5".to_string()),
            ("limit".to_string(), "x".to_string()),
        ];
        assert_eq!(first_value(&params, "limit"), Some("5"));
        assert_eq!(first_value(&params, "offset"), None);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let mut store = MockDataStore::new();
        store
            .expect_get_resources()
            .returning(|_| Err(StubError::Config("store offline".to_string())));
        let state = AppState::new(Arc::new(store), Paginator::default());

        let (status, body) = get(state, "/resources").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, INTERNAL_ERROR_BODY);
        assert!(!body.contains("offline"));
    }
}

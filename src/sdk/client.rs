//! HTTP client for the listing API.
//!
//! # Example
//!
//! ```rust,no_run
//! use search_upstream_stub::sdk::{Options, UpstreamClient, UpstreamClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = UpstreamClient::new(UpstreamClientConfig::new("http://localhost:29600"))?;
//!     let page = client.get_resources(&Options::new().limit(5)).await?;
//!     println!("{} of {} resources", page.count, page.total_count);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::options::Options;
use crate::api::{HealthResponse, HEALTH_PATH, RESOURCES_PATH};
use crate::models::Resources;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// Base URL or endpoint could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Operations a consumer of the listing API depends on.
///
/// Enable the `mocks` feature to get `MockUpstreamApi` outside this crate.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait UpstreamApi: Send + Sync {
    /// Gets one page of resources.
    async fn get_resources(&self, options: &Options) -> Result<Resources<JsonValue>, ClientError>;

    /// Calls the health endpoint.
    async fn health(&self) -> Result<HealthResponse, ClientError>;
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct UpstreamClientConfig {
    /// Base URL of the service.
    pub base_url: String,
    /// Path of the listing endpoint.
    pub resources_endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl UpstreamClientConfig {
    /// Configuration for `base_url` with the default endpoint and timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            resources_endpoint: RESOURCES_PATH.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Client for the listing API.
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
    resources_endpoint: String,
}

impl UpstreamClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Url` for a malformed base URL and
    /// `ClientError::Http` if the HTTP client cannot be created.
    pub fn new(config: UpstreamClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url)?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            resources_endpoint: config.resources_endpoint,
        })
    }

    /// Base URL used by this client.
    pub fn url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn resources_endpoint(&self) -> &str {
        &self.resources_endpoint
    }

    /// Gets one page of resources.
    ///
    /// Items are returned as raw JSON since listing records vary in shape.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with the response body for non-2xx
    /// responses.
    pub async fn get_resources(
        &self,
        options: &Options,
    ) -> Result<Resources<JsonValue>, ClientError> {
        let url = self.base_url.join(&self.resources_endpoint)?;
        let mut request = self.client.get(url).query(options.query());
        for (name, value) in options.headers() {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            let resources: Resources<JsonValue> = response.json().await?;
            debug!(
                count = resources.count,
                total_count = resources.total_count,
                "Fetched resources"
            );
            Ok(resources)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    /// Calls the health endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` for non-2xx responses.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.base_url.join(HEALTH_PATH)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}

#[async_trait]
impl UpstreamApi for UpstreamClient {
    async fn get_resources(
        &self,
        options: &Options,
    ) -> Result<Resources<JsonValue>, ClientError> {
        UpstreamClient::get_resources(self, options).await
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        UpstreamClient::health(self).await
    }
}

//! Client SDK for the listing API
//!
//! Used by downstream services (and the integration tests) to read pages of
//! resources over HTTP.

pub mod client;
pub mod options;

pub use client::{ClientError, UpstreamApi, UpstreamClient, UpstreamClientConfig};
#[cfg(any(test, feature = "mocks"))]
pub use client::MockUpstreamApi;
pub use options::{Options, AUTHORIZATION};

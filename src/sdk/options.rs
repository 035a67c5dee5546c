//! Per-request options for [`super::UpstreamClient`].

use crate::pagination::{PARAM_LIMIT, PARAM_OFFSET};

/// Authorization header name.
pub const AUTHORIZATION: &str = "Authorization";

/// Query parameters and headers for one call.
///
/// Setting the same parameter or header twice replaces the earlier value.
///
/// # Example
///
/// ```rust
/// use search_upstream_stub::sdk::Options;
///
/// let options = Options::new().limit(10).offset(5).limit(20);
/// assert_eq!(
///     options.query(),
///     &[("limit".to_string(), "20".to_string()), ("offset".to_string(), "5".to_string())]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `offset` query parameter.
    pub fn offset(self, value: impl ToString) -> Self {
        self.param(PARAM_OFFSET, value.to_string())
    }

    /// Sets the `limit` query parameter.
    pub fn limit(self, value: impl ToString) -> Self {
        self.param(PARAM_LIMIT, value.to_string())
    }

    /// Sets a request header. Names compare case-insensitively.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn param(mut self, name: &str, value: String) -> Self {
        match self.query.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = value,
            None => self.query.push((name.to_string(), value)),
        }
        self
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A JSON object as returned by the API.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// One response of a paginated listing endpoint.
///
/// Only `results` and `next` drive pagination; `count` and `previous` are
/// carried for diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub results: Vec<JsonObject>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub previous: Option<String>,
}

impl Page {
    /// Build a page from records and an optional next link.
    pub fn new(results: Vec<JsonObject>, next: Option<String>) -> Self {
        Self {
            count: Some(results.len() as u64),
            results,
            next,
            previous: None,
        }
    }

    /// True when this is the last page of the chain.
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// Per-request options for [`crate::Fetch::get_with`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra query string parameters.
    pub query: Vec<(String, String)>,
    /// Overrides the session timeout for this request.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query string parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

//! Mock fetch capability for testing.
//!
//! Provides a configurable in-memory implementation of the [`Fetch`] trait.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::error::{FetchError, Result};
use crate::types::{JsonObject, Page, RequestOptions};
use crate::Fetch;

#[derive(Debug, Clone)]
enum MockResponse {
    Json(Value),
    Status(u16),
}

/// Mock fetch capability for testing.
///
/// Serves canned responses keyed by URL, records every request, and enforces
/// the same open/close discipline as [`crate::SwapiClient`]. Unknown URLs
/// answer with HTTP 404.
///
/// # Example
///
/// ```rust
/// use swapi_client::testing::MockFetch;
/// use swapi_client::Session;
/// use serde_json::json;
///
/// let mock = MockFetch::new().with_json("https://swapi/planets/1/", json!({"name": "Tatooine"}));
/// let session = Session::open(&mock).unwrap();
/// let planet = session.get("https://swapi/planets/1/").unwrap();
/// assert_eq!(planet["name"], "Tatooine");
/// ```
#[derive(Default)]
pub struct MockFetch {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    calls: Arc<RwLock<Vec<String>>>,
    open: Arc<RwLock<bool>>,
    open_count: Arc<RwLock<usize>>,
    close_count: Arc<RwLock<usize>>,
}

impl MockFetch {
    /// Create a new mock with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn add_json(&self, url: impl Into<String>, body: Value) {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Json(body));
    }

    /// Serve a listing page for `url`.
    pub fn add_page(&self, url: impl Into<String>, page: &Page) {
        let body = serde_json::to_value(page).unwrap();
        self.add_json(url, body);
    }

    /// Answer `url` with a bare HTTP status.
    pub fn add_status(&self, url: impl Into<String>, status: u16) {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Status(status));
    }

    /// Builder form of [`MockFetch::add_json`].
    pub fn with_json(self, url: impl Into<String>, body: Value) -> Self {
        self.add_json(url, body);
        self
    }

    /// Builder form of [`MockFetch::add_page`].
    pub fn with_page(self, url: impl Into<String>, page: &Page) -> Self {
        self.add_page(url, page);
        self
    }

    /// Builder form of [`MockFetch::add_status`].
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.add_status(url, status);
        self
    }

    /// Answer `url` with HTTP 429.
    pub fn with_rate_limit(self, url: impl Into<String>) -> Self {
        self.with_status(url, 429)
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Number of requests made to `url`.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.read().unwrap().iter().filter(|u| *u == url).count()
    }

    pub fn is_open(&self) -> bool {
        *self.open.read().unwrap()
    }

    pub fn open_count(&self) -> usize {
        *self.open_count.read().unwrap()
    }

    pub fn close_count(&self) -> usize {
        *self.close_count.read().unwrap()
    }

    /// Clear the request log and session counters.
    pub fn reset_calls(&self) {
        self.calls.write().unwrap().clear();
        *self.open_count.write().unwrap() = 0;
        *self.close_count.write().unwrap() = 0;
    }
}

impl Clone for MockFetch {
    fn clone(&self) -> Self {
        Self {
            responses: Arc::clone(&self.responses),
            calls: Arc::clone(&self.calls),
            open: Arc::clone(&self.open),
            open_count: Arc::clone(&self.open_count),
            close_count: Arc::clone(&self.close_count),
        }
    }
}

impl Fetch for MockFetch {
    fn open(&self) -> Result<()> {
        let mut open = self.open.write().unwrap();
        if *open {
            return Err(FetchError::SessionAlreadyOpen);
        }
        *open = true;
        *self.open_count.write().unwrap() += 1;
        Ok(())
    }

    fn get_with(&self, url: &str, _options: &RequestOptions) -> Result<JsonObject> {
        if !self.is_open() {
            return Err(FetchError::SessionNotOpen);
        }
        self.calls.write().unwrap().push(url.to_string());

        let response = self.responses.read().unwrap().get(url).cloned();
        match response {
            Some(MockResponse::Json(body)) => {
                serde_json::from_value(body).map_err(|source| FetchError::Decode {
                    url: url.to_string(),
                    source,
                })
            }
            Some(MockResponse::Status(429)) => Err(FetchError::RateLimited {
                url: url.to_string(),
            }),
            Some(MockResponse::Status(status)) => Err(FetchError::RequestFailed {
                url: url.to_string(),
                status,
                message: String::new(),
            }),
            None => Err(FetchError::RequestFailed {
                url: url.to_string(),
                status: 404,
                message: "Not found".to_string(),
            }),
        }
    }

    fn close(&self) -> Result<()> {
        let mut open = self.open.write().unwrap();
        if !*open {
            return Err(FetchError::SessionNotOpen);
        }
        *open = false;
        *self.close_count.write().unwrap() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serves_canned_json() {
        let mock = MockFetch::new().with_json("https://swapi/a", json!({"name": "A"}));
        mock.open().unwrap();
        let body = mock.get("https://swapi/a").unwrap();
        assert_eq!(body["name"], "A");
        assert_eq!(mock.calls(), vec!["https://swapi/a".to_string()]);
        mock.close().unwrap();
    }

    #[test]
    fn test_rate_limit_and_missing() {
        let mock = MockFetch::new().with_rate_limit("https://swapi/slow");
        mock.open().unwrap();
        assert!(mock.get("https://swapi/slow").unwrap_err().is_rate_limited());
        assert_eq!(mock.get("https://swapi/nope").unwrap_err().status(), Some(404));
        mock.close().unwrap();
    }

    #[test]
    fn test_non_object_body_is_decode_error() {
        let mock = MockFetch::new().with_json("https://swapi/list", json!([1, 2, 3]));
        mock.open().unwrap();
        let err = mock.get("https://swapi/list").unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
        mock.close().unwrap();
    }

    #[test]
    fn test_get_page() {
        let page = Page::new(vec![], None);
        let mock = MockFetch::new().with_page("https://swapi/people/", &page);
        mock.open().unwrap();
        let fetched = mock.get_page("https://swapi/people/").unwrap();
        assert!(fetched.results.is_empty());
        assert!(fetched.is_last());
        mock.close().unwrap();
    }

    #[test]
    fn test_clones_share_state() {
        let mock = MockFetch::new();
        let clone = mock.clone();
        mock.open().unwrap();
        assert!(clone.is_open());
        clone.close().unwrap();
        assert!(!mock.is_open());
    }
}

//! Blocking client for the Star Wars API.
//!
//! A minimal client for paginated JSON endpoints. The HTTP session is a scoped
//! resource: it is created by [`Fetch::open`], used by [`Fetch::get`], and
//! released by [`Fetch::close`]. Prefer the [`Session`] guard, which releases
//! on drop.
//!
//! # Example
//!
//! ```rust,ignore
//! use swapi_client::{Session, SwapiClient};
//!
//! let client = SwapiClient::new();
//! let session = Session::open(&client)?;
//! let page = session.get_page("https://swapi.dev/api/people/")?;
//! for person in &page.results {
//!     println!("{}", person["name"]);
//! }
//! ```

pub mod error;
pub mod session;
pub mod testing;
pub mod types;

pub use error::{FetchError, Result};
pub use session::Session;
pub use types::{JsonObject, Page, RequestOptions};

use std::cell::RefCell;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{debug, error, warn};

const DEFAULT_USER_AGENT: &str = "swapi-client/0.1";

/// Capability to fetch JSON objects from URLs within an open session.
pub trait Fetch {
    /// Acquire the session. Fails if it is already open.
    fn open(&self) -> Result<()>;

    /// GET `url` with extra options and return the decoded JSON object.
    ///
    /// Fails with [`FetchError::RateLimited`] on HTTP 429 and
    /// [`FetchError::RequestFailed`] on any other non-2xx status.
    fn get_with(&self, url: &str, options: &RequestOptions) -> Result<JsonObject>;

    /// Release the session. Fails if it is not open.
    fn close(&self) -> Result<()>;

    /// GET `url` with default options.
    fn get(&self, url: &str) -> Result<JsonObject> {
        self.get_with(url, &RequestOptions::default())
    }

    /// GET `url` and decode it as a listing page.
    fn get_page(&self, url: &str) -> Result<Page> {
        let body = self.get(url)?;
        serde_json::from_value(serde_json::Value::Object(body)).map_err(|source| {
            FetchError::Decode {
                url: url.to_string(),
                source,
            }
        })
    }
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn open(&self) -> Result<()> {
        (**self).open()
    }

    fn get_with(&self, url: &str, options: &RequestOptions) -> Result<JsonObject> {
        (**self).get_with(url, options)
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }
}

/// HTTP implementation of [`Fetch`] backed by `reqwest`'s blocking client.
///
/// The underlying `reqwest` client is built on every `open()` and dropped on
/// `close()`. The type is single-threaded by construction.
pub struct SwapiClient {
    token: Option<String>,
    timeout: Duration,
    user_agent: String,
    session: RefCell<Option<Client>>,
}

impl Default for SwapiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SwapiClient {
    /// Create a client for plain (unauthenticated) requests.
    pub fn new() -> Self {
        Self {
            token: None,
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            session: RefCell::new(None),
        }
    }

    /// Send a bearer token with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the default per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Whether a session is currently open.
    pub fn is_open(&self) -> bool {
        self.session.borrow().is_some()
    }

    fn make_session(&self) -> Result<Client> {
        Ok(Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?)
    }
}

impl Fetch for SwapiClient {
    fn open(&self) -> Result<()> {
        let mut session = self.session.borrow_mut();
        if session.is_some() {
            error!("Session opened twice");
            return Err(FetchError::SessionAlreadyOpen);
        }
        *session = Some(self.make_session()?);
        debug!("Session opened");
        Ok(())
    }

    fn get_with(&self, url: &str, options: &RequestOptions) -> Result<JsonObject> {
        let session = self.session.borrow();
        let Some(client) = session.as_ref() else {
            error!(url = %url, "GET outside an open session");
            return Err(FetchError::SessionNotOpen);
        };

        debug!(url = %url, "GET");
        let mut request = client.get(url);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send()?;
        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(url = %url, "Rate limit exceeded");
            return Err(FetchError::RateLimited {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            let message = resp.text().unwrap_or_default();
            return Err(FetchError::RequestFailed {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text()?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn close(&self) -> Result<()> {
        match self.session.borrow_mut().take() {
            Some(_) => {
                debug!("Session closed");
                Ok(())
            }
            None => {
                error!("Closing a session that is not open");
                Err(FetchError::SessionNotOpen)
            }
        }
    }
}

//! Scoped session guard.

use crate::error::Result;
use crate::types::{JsonObject, Page, RequestOptions};
use crate::Fetch;

/// An open session on a [`Fetch`] capability.
///
/// Opening the guard calls [`Fetch::open`]; dropping it calls
/// [`Fetch::close`], so the session is released even when a walk fails
/// half-way. Use [`Session::close`] to observe close errors.
pub struct Session<'a, F: Fetch + ?Sized> {
    fetch: &'a F,
    released: bool,
}

impl<'a, F: Fetch + ?Sized> Session<'a, F> {
    /// Open a session. Fails with `SessionAlreadyOpen` if one is active.
    pub fn open(fetch: &'a F) -> Result<Self> {
        fetch.open()?;
        Ok(Self {
            fetch,
            released: false,
        })
    }

    /// The underlying capability, for callers that share the open session.
    pub fn fetch(&self) -> &'a F {
        self.fetch
    }

    pub fn get(&self, url: &str) -> Result<JsonObject> {
        self.fetch().get(url)
    }

    pub fn get_with(&self, url: &str, options: &RequestOptions) -> Result<JsonObject> {
        self.fetch().get_with(url, options)
    }

    pub fn get_page(&self, url: &str) -> Result<Page> {
        self.fetch().get_page(url)
    }

    /// Release the session explicitly.
    pub fn close(mut self) -> Result<()> {
        self.released = true;
        self.fetch.close()
    }
}

impl<F: Fetch + ?Sized> Drop for Session<'_, F> {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.fetch.close() {
                tracing::error!(error = %e, "Failed to close session");
            }
        }
    }
}

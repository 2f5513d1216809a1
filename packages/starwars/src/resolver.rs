//! Memoized planet URL → name lookups.

use std::cell::RefCell;
use std::num::NonZeroUsize;

use lru::LruCache;
use swapi_client::Fetch;
use tracing::debug;

use crate::error::Result;

/// Default number of cached planet names.
pub const DEFAULT_CAPACITY: usize = 100;

/// Resolves planet URLs to display names, caching results per URL.
///
/// The cache key is the URL alone: any fetch capability passed to
/// [`PlanetResolver::resolve`] is assumed to return the same planet for the
/// same URL. Both found names and missing names (`None`) are cached. The
/// cache is bounded and evicts the least recently used entry.
///
/// The resolver is single-threaded; wrap it in a lock before sharing it
/// between threads.
pub struct PlanetResolver {
    cache: RefCell<LruCache<String, Option<String>>>,
}

impl Default for PlanetResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PlanetResolver {
    /// Create a resolver holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RefCell::new(LruCache::new(capacity)),
        }
    }

    /// Name of the planet at `url`, or `None` if the payload has no `name`.
    ///
    /// Cache misses issue one request through `fetch`, which must have an
    /// open session.
    pub fn resolve<F: Fetch + ?Sized>(&self, fetch: &F, url: &str) -> Result<Option<String>> {
        if let Some(name) = self.cache.borrow_mut().get(url) {
            debug!(url = %url, "Planet cache hit");
            return Ok(name.clone());
        }

        debug!(url = %url, "Planet cache miss");
        let planet = fetch.get(url)?;
        let name = planet
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        self.cache.borrow_mut().put(url.to_string(), name.clone());
        Ok(name)
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.borrow().cap().get()
    }

    /// Whether `url` is cached, without touching recency.
    pub fn contains(&self, url: &str) -> bool {
        self.cache.borrow().contains(url)
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

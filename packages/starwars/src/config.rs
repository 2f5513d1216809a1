use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

use crate::error::{Result, StarWarsError};

/// Starting URL of the people listing.
pub const DEFAULT_FETCH_URL: &str = "https://swapi.dev/api/people/";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub fetch_url: String,
    pub default_per_page: usize,
    pub dataset_dir: PathBuf,
    pub swapi_token: Option<String>,
    pub planet_cache_capacity: usize,
    pub max_pages: Option<usize>,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_url: DEFAULT_FETCH_URL.to_string(),
            default_per_page: 10,
            dataset_dir: PathBuf::from("./data"),
            swapi_token: None,
            planet_cache_capacity: 100,
            max_pages: None,
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            fetch_url: lookup("DATASET_FETCH_URL").unwrap_or(defaults.fetch_url),
            default_per_page: parse_var(&lookup, "DATASET_DEFAULT_PER_PAGE")?
                .unwrap_or(defaults.default_per_page),
            dataset_dir: lookup("DATASET_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_dir),
            swapi_token: lookup("SWAPI_TOKEN").filter(|t| !t.is_empty()),
            planet_cache_capacity: parse_var(&lookup, "PLANET_CACHE_CAPACITY")?
                .unwrap_or(defaults.planet_cache_capacity),
            max_pages: parse_var(&lookup, "FETCH_MAX_PAGES")?,
            http_timeout: parse_var(&lookup, "HTTP_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
        })
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| StarWarsError::Config(format!("{key} must be a valid number, got {raw:?}"))),
    }
}

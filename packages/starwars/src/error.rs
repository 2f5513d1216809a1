//! Typed errors for the Star Wars ETL library.

use etl_table::TableError;
use swapi_client::FetchError;
use thiserror::Error;

/// Errors raised while fetching, transforming or storing datasets.
#[derive(Debug, Error)]
pub enum StarWarsError {
    /// The API request failed (rate limit, HTTP status, transport, session misuse).
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A value expected to be an ISO datetime string did not parse.
    #[error("malformed ISO datetime: {value:?}")]
    MalformedDate { value: String },

    /// A record carried a field the header (from the first record) lacks.
    #[error("record has field {field:?} missing from header")]
    UnexpectedField { field: String },

    /// The page-chain exceeded the configured page cap.
    #[error("max pages reached: {count}")]
    MaxPagesReached { count: usize },

    /// A table stage failed.
    #[error("table error: {0}")]
    Table(TableError),

    /// Reading or writing stored datasets failed.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Dataset bookkeeping could not be (de)serialized.
    #[error("dataset index error: {0}")]
    Index(#[from] serde_json::Error),

    /// No dataset with this id.
    #[error("dataset not found: {id}")]
    DatasetNotFound { id: String },

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),
}

impl StarWarsError {
    /// True when the remote API signalled throttling.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, StarWarsError::Fetch(e) if e.is_rate_limited())
    }

    /// True when a session was opened twice or used while closed. This is a
    /// bug in the caller, never a remote failure.
    pub fn is_misuse(&self) -> bool {
        matches!(self, StarWarsError::Fetch(e) if e.is_misuse())
    }
}

/// Errors from stages and sources travel boxed inside `TableError::Stage`;
/// unwrap them so callers can match on the original variant.
impl From<TableError> for StarWarsError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::Stage(inner) => match inner.downcast::<StarWarsError>() {
                Ok(e) => *e,
                Err(inner) => match inner.downcast::<FetchError>() {
                    Ok(e) => StarWarsError::Fetch(*e),
                    Err(inner) => StarWarsError::Table(TableError::Stage(inner)),
                },
            },
            other => StarWarsError::Table(other),
        }
    }
}

/// Result type alias for Star Wars ETL operations.
pub type Result<T> = std::result::Result<T, StarWarsError>;

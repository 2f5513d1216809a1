//! Typed errors for table operations.

use thiserror::Error;

/// Errors raised while building or scanning a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// A stage referenced a column the header does not have.
    #[error("field not found: {name}")]
    FieldNotFound { name: String },

    /// A header would contain the same column twice.
    #[error("duplicate field: {name}")]
    DuplicateField { name: String },

    /// A row does not line up with its header.
    #[error("row has {actual} values but header has {expected} fields")]
    RowLength { expected: usize, actual: usize },

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// I/O failure at a file boundary.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A source or caller-provided stage function failed.
    ///
    /// The original error is kept boxed so callers can downcast it.
    #[error("{0}")]
    Stage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TableError {
    /// Wrap an error raised by a source or a stage function.
    pub fn stage(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        TableError::Stage(err.into())
    }

    pub(crate) fn field_not_found(name: impl Into<String>) -> Self {
        TableError::FieldNotFound { name: name.into() }
    }
}

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

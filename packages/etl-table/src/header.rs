//! Table headers and named row access.

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, TableError};
use crate::value::Value;

/// Ordered, duplicate-free list of column names.
///
/// Cheap to clone; stages share the header of every row they emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Arc<[String]>,
}

impl Header {
    /// Build a header, rejecting duplicate names.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(TableError::DuplicateField { name: name.clone() });
            }
        }
        Ok(Self {
            names: names.into(),
        })
    }

    /// Header with no columns (an empty source).
    pub fn empty() -> Self {
        Self {
            names: Arc::from(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Position of a column, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Position of a column, or `FieldNotFound`.
    pub fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| TableError::field_not_found(name))
    }

    /// This header with one more column appended.
    pub fn with_field(&self, name: &str) -> Result<Self> {
        Self::new(self.iter().chain(std::iter::once(name)))
    }

    /// This header without the given columns, plus the kept positions.
    pub fn without(&self, fields: &[String]) -> Result<(Self, Vec<usize>)> {
        for field in fields {
            self.require(field)?;
        }
        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| !fields.contains(&self.names[i]))
            .collect();
        let header = Self::new(keep.iter().map(|&i| self.names[i].clone()))?;
        Ok((header, keep))
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.names.join(", "))
    }
}

/// A row viewed through its header, for lookups by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    header: &'a Header,
    values: &'a [Value],
}

impl<'a> Record<'a> {
    pub fn new(header: &'a Header, values: &'a [Value]) -> Self {
        Self { header, values }
    }

    /// Value of `name`, or `None` when the column does not exist.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.header.index_of(name).and_then(|i| self.values.get(i))
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    pub fn header(&self) -> &'a Header {
        self.header
    }
}

use std::cmp::Ordering;

use crate::error::{Result, TableError};
use crate::table::{Scan, Table};

/// Sorting order for [`Sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Stable sort by one column.
///
/// Ties keep their upstream order in both directions. A missing column is an
/// error unless [`Sort::skip_if_missing`] is set, in which case the table
/// passes through unsorted.
pub struct Sort<T> {
    inner: T,
    field: String,
    order: SortOrder,
    skip_missing: bool,
}

impl<T: Table> Sort<T> {
    pub fn new(inner: T, field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            inner,
            field: field.into(),
            order,
            skip_missing: false,
        }
    }

    /// Pass rows through unchanged when the column does not exist.
    pub fn skip_if_missing(mut self) -> Self {
        self.skip_missing = true;
        self
    }
}

impl<T: Table> Table for Sort<T> {
    fn scan(&self) -> Result<Scan<'_>> {
        let upstream = self.inner.scan()?;
        let header = upstream.header().clone();
        let idx = match header.index_of(&self.field) {
            Some(idx) => idx,
            None if self.skip_missing => return Ok(upstream),
            None => return Err(TableError::field_not_found(&self.field)),
        };

        let mut rows = upstream.collect_rows()?;
        rows.sort_by(|a, b| self.order.apply(a[idx].cmp(&b[idx])));
        tracing::trace!(field = %self.field, rows = rows.len(), "Sorted rows");

        Ok(Scan::from_rows(header, rows))
    }
}

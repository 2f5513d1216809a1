//! The lazy table abstraction.

use crate::error::{Result, TableError};
use crate::header::Header;
use crate::value::Value;

/// One row, positionally aligned to its header.
pub type Row = Vec<Value>;

/// Boxed row iterator produced by a scan.
pub type RowIter<'a> = Box<dyn Iterator<Item = Result<Row>> + 'a>;

/// One pass over a table: the header plus a lazy row iterator.
///
/// A scan enforces row arity against its header and stops after the first
/// error, so a failure aborts iteration. Rows yielded before the failure
/// stay with the consumer.
pub struct Scan<'a> {
    header: Header,
    rows: RowIter<'a>,
    failed: bool,
}

impl<'a> Scan<'a> {
    pub fn new<I>(header: Header, rows: I) -> Self
    where
        I: Iterator<Item = Result<Row>> + 'a,
    {
        Self {
            header,
            rows: Box::new(rows),
            failed: false,
        }
    }

    /// Scan over rows that are already in memory.
    pub fn from_rows(header: Header, rows: Vec<Row>) -> Self {
        Self::new(header, rows.into_iter().map(Ok))
    }

    /// A scan with no columns and no rows.
    pub fn empty() -> Self {
        Self::from_rows(Header::empty(), Vec::new())
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Drain the remaining rows into memory.
    pub fn collect_rows(self) -> Result<Vec<Row>> {
        self.collect()
    }
}

impl Iterator for Scan<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = match self.rows.next()? {
            Ok(row) if row.len() != self.header.len() => Err(TableError::RowLength {
                expected: self.header.len(),
                actual: row.len(),
            }),
            other => other,
        };
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

/// A re-iterable, lazily evaluated table.
///
/// Nothing upstream runs until [`Table::scan`] is called, and every call
/// re-runs the whole upstream chain: a table backed by a network source
/// refetches its data on each scan. Use [`crate::TableExt::materialize`] to
/// opt into buffering.
pub trait Table {
    /// Start a fresh pass over the table.
    fn scan(&self) -> Result<Scan<'_>>;

    /// The header. Starts a scan, so it may run upstream work.
    fn header(&self) -> Result<Header> {
        Ok(self.scan()?.header().clone())
    }

    /// All data rows of one scan.
    fn rows(&self) -> Result<Vec<Row>> {
        self.scan()?.collect_rows()
    }

    /// Number of data rows of one scan.
    fn row_count(&self) -> Result<usize> {
        let mut count = 0;
        for row in self.scan()? {
            row?;
            count += 1;
        }
        Ok(count)
    }
}

impl<T: Table + ?Sized> Table for &T {
    fn scan(&self) -> Result<Scan<'_>> {
        (**self).scan()
    }
}

impl<T: Table + ?Sized> Table for Box<T> {
    fn scan(&self) -> Result<Scan<'_>> {
        (**self).scan()
    }
}

/// Boxed table with an erased stage chain.
pub type BoxTable<'a> = Box<dyn Table + 'a>;

/// A table held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    header: Header,
    rows: Vec<Row>,
}

impl MemoryTable {
    /// Build a table, checking every row against the header.
    pub fn new(header: Header, rows: Vec<Row>) -> Result<Self> {
        if let Some(bad) = rows.iter().find(|r| r.len() != header.len()) {
            return Err(TableError::RowLength {
                expected: header.len(),
                actual: bad.len(),
            });
        }
        Ok(Self { header, rows })
    }

    /// Convenience constructor from column names and rows.
    pub fn from_parts<I, S>(names: I, rows: Vec<Row>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Header::new(names)?, rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Table for MemoryTable {
    fn scan(&self) -> Result<Scan<'_>> {
        Ok(Scan::new(
            self.header.clone(),
            self.rows.iter().cloned().map(Ok),
        ))
    }
}

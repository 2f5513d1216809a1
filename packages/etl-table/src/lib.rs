//! Lazy, re-iterable tables.
//!
//! A [`Table`] is a header plus a lazily produced sequence of rows. Stages
//! wrap a table and return a new one; nothing runs until the outermost table
//! is scanned, and every scan re-runs the whole chain.
//!
//! # Usage
//!
//! ```rust,ignore
//! use etl_table::{CsvTable, SortOrder, TableExt};
//!
//! let table = CsvTable::from_path("people.csv")
//!     .value_counts(["homeworld"])
//!     .cutout(["frequency"])
//!     .sort_by("count", SortOrder::Desc)
//!     .head(5);
//!
//! for row in table.scan()? {
//!     println!("{:?}", row?);
//! }
//! ```
//!
//! # Modules
//!
//! - [`table`] - `Table` trait, `Scan`, in-memory tables
//! - [`ops`] - stages (add field, convert, cutout, value counts, sort, slice)
//! - [`csv`] - CSV source and sink

pub mod csv;
pub mod error;
pub mod header;
pub mod ops;
pub mod table;
pub mod value;

pub use crate::csv::{to_csv, to_csv_bytes, CsvTable};
pub use error::{Result, TableError};
pub use header::{Header, Record};
pub use ops::{
    AddField, Convert, Cutout, RowSlice, Sort, SortOrder, ValueCounts, COUNT_FIELD, FREQUENCY_FIELD,
};
pub use table::{BoxTable, MemoryTable, Row, RowIter, Scan, Table};
pub use value::Value;

/// Combinators for building stage chains.
pub trait TableExt: Table + Sized {
    /// Append a column computed from each row.
    fn add_field<F>(self, name: impl Into<String>, func: F) -> AddField<Self, F>
    where
        F: Fn(Record<'_>) -> Result<Value>,
    {
        AddField::new(self, name, func)
    }

    /// Replace the values of one column.
    fn convert<F>(self, field: impl Into<String>, func: F) -> Convert<Self, F>
    where
        F: Fn(&Value) -> Result<Value>,
    {
        Convert::new(self, field, func)
    }

    /// Remove columns.
    fn cutout<I, S>(self, fields: I) -> Cutout<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Cutout::new(self, fields)
    }

    /// Count distinct value combinations of `fields`.
    fn value_counts<I, S>(self, fields: I) -> ValueCounts<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueCounts::new(self, fields)
    }

    /// Stable sort by one column.
    fn sort_by(self, field: impl Into<String>, order: SortOrder) -> Sort<Self> {
        Sort::new(self, field, order)
    }

    /// Keep at most the first `limit` rows.
    fn head(self, limit: usize) -> RowSlice<Self> {
        RowSlice::new(self, limit)
    }

    /// Buffer one scan in memory.
    ///
    /// Later scans of the returned table do not touch the upstream chain.
    fn materialize(&self) -> Result<MemoryTable> {
        let scan = self.scan()?;
        let header = scan.header().clone();
        MemoryTable::new(header, scan.collect_rows()?)
    }

    /// Erase the stage chain's type.
    fn boxed<'a>(self) -> BoxTable<'a>
    where
        Self: 'a,
    {
        Box::new(self)
    }
}

impl<T: Table> TableExt for T {}

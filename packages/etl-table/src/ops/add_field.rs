use crate::error::Result;
use crate::header::Record;
use crate::table::{Row, Scan, Table};
use crate::value::Value;

/// Appends a column computed from each row.
pub struct AddField<T, F> {
    inner: T,
    name: String,
    func: F,
}

impl<T, F> AddField<T, F>
where
    T: Table,
    F: Fn(Record<'_>) -> Result<Value>,
{
    pub fn new(inner: T, name: impl Into<String>, func: F) -> Self {
        Self {
            inner,
            name: name.into(),
            func,
        }
    }
}

impl<T, F> Table for AddField<T, F>
where
    T: Table,
    F: Fn(Record<'_>) -> Result<Value>,
{
    fn scan(&self) -> Result<Scan<'_>> {
        let upstream = self.inner.scan()?;
        let source_header = upstream.header().clone();
        let header = source_header.with_field(&self.name)?;
        let func = &self.func;

        let rows = upstream.map(move |row| -> Result<Row> {
            let mut row = row?;
            let value = func(Record::new(&source_header, &row))?;
            row.push(value);
            Ok(row)
        });
        Ok(Scan::new(header, rows))
    }
}

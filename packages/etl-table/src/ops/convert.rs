use crate::error::Result;
use crate::table::{Row, Scan, Table};
use crate::value::Value;

/// Replaces every value of one column with `func(value)`.
pub struct Convert<T, F> {
    inner: T,
    field: String,
    func: F,
}

impl<T, F> Convert<T, F>
where
    T: Table,
    F: Fn(&Value) -> Result<Value>,
{
    pub fn new(inner: T, field: impl Into<String>, func: F) -> Self {
        Self {
            inner,
            field: field.into(),
            func,
        }
    }
}

impl<T, F> Table for Convert<T, F>
where
    T: Table,
    F: Fn(&Value) -> Result<Value>,
{
    fn scan(&self) -> Result<Scan<'_>> {
        let upstream = self.inner.scan()?;
        let header = upstream.header().clone();
        let idx = header.require(&self.field)?;
        let func = &self.func;

        let rows = upstream.map(move |row| -> Result<Row> {
            let mut row = row?;
            row[idx] = func(&row[idx])?;
            Ok(row)
        });
        Ok(Scan::new(header, rows))
    }
}

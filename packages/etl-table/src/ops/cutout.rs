use crate::error::Result;
use crate::table::{Row, Scan, Table};

/// Removes a set of columns. Every named column must exist.
pub struct Cutout<T> {
    inner: T,
    fields: Vec<String>,
}

impl<T: Table> Cutout<T> {
    pub fn new<I, S>(inner: T, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl<T: Table> Table for Cutout<T> {
    fn scan(&self) -> Result<Scan<'_>> {
        let upstream = self.inner.scan()?;
        let (header, keep) = upstream.header().without(&self.fields)?;

        let rows = upstream.map(move |row| -> Result<Row> {
            Ok(row?
                .into_iter()
                .enumerate()
                .filter(|(i, _)| keep.binary_search(i).is_ok())
                .map(|(_, v)| v)
                .collect())
        });
        Ok(Scan::new(header, rows))
    }
}

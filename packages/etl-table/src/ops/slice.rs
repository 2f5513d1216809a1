use crate::error::Result;
use crate::table::{Scan, Table};

/// Emits at most the first `limit` rows and stops pulling upstream after that.
pub struct RowSlice<T> {
    inner: T,
    limit: usize,
}

impl<T: Table> RowSlice<T> {
    pub fn new(inner: T, limit: usize) -> Self {
        Self { inner, limit }
    }
}

impl<T: Table> Table for RowSlice<T> {
    fn scan(&self) -> Result<Scan<'_>> {
        let upstream = self.inner.scan()?;
        let header = upstream.header().clone();
        Ok(Scan::new(header, upstream.take(self.limit)))
    }
}

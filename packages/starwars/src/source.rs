//! Lazy table over a paginated listing endpoint.

use std::collections::VecDeque;

use etl_table::{Header, Row, Scan, Table, TableError, Value};
use swapi_client::{Fetch, JsonObject, Session};
use tracing::{debug, info};

use crate::error::StarWarsError;

/// A table whose rows are the records of a page-chain.
///
/// Each scan opens a session on the fetch capability, walks the chain from
/// `initial_url` following every page's `next` link, and releases the session
/// when the walk ends, fails or is dropped. Nothing is cached: scanning the
/// table twice fetches every page twice.
///
/// The header is the key order of the first record found. Later records
/// missing one of those keys yield [`Value::Null`] there; a record with a key
/// outside the header fails the scan with [`StarWarsError::UnexpectedField`].
pub struct PaginatedTable<'c, F: Fetch + ?Sized> {
    fetch: &'c F,
    initial_url: String,
    max_pages: Option<usize>,
}

impl<'c, F: Fetch + ?Sized> PaginatedTable<'c, F> {
    pub fn new(fetch: &'c F, initial_url: impl Into<String>) -> Self {
        Self {
            fetch,
            initial_url: initial_url.into(),
            max_pages: None,
        }
    }

    /// Fail the walk once more than `max_pages` pages would be fetched.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn initial_url(&self) -> &str {
        &self.initial_url
    }
}

impl<F: Fetch + ?Sized> Table for PaginatedTable<'_, F> {
    fn scan(&self) -> etl_table::Result<Scan<'_>> {
        let session = Session::open(self.fetch).map_err(TableError::stage)?;
        let mut walk = PageWalk {
            session: Some(session),
            header: Header::empty(),
            pending: VecDeque::new(),
            next_url: Some(self.initial_url.clone()),
            pages_fetched: 0,
            max_pages: self.max_pages,
        };

        let header = loop {
            if let Some(first) = walk.pending.front() {
                break Header::new(first.keys().cloned())?;
            }
            if !walk.fetch_next_page()? {
                break Header::empty();
            }
        };
        debug!(url = %self.initial_url, header = %header, "Derived header");
        walk.header = header.clone();

        Ok(Scan::new(header, walk))
    }
}

struct PageWalk<'c, F: Fetch + ?Sized> {
    session: Option<Session<'c, F>>,
    header: Header,
    pending: VecDeque<JsonObject>,
    next_url: Option<String>,
    pages_fetched: usize,
    max_pages: Option<usize>,
}

impl<F: Fetch + ?Sized> PageWalk<'_, F> {
    /// Fetch the next page into `pending`. Returns false once the chain is
    /// exhausted, after releasing the session.
    fn fetch_next_page(&mut self) -> etl_table::Result<bool> {
        let Some(url) = self.next_url.take() else {
            self.release()?;
            return Ok(false);
        };
        if let Some(max) = self.max_pages {
            if self.pages_fetched >= max {
                self.session = None;
                return Err(TableError::stage(StarWarsError::MaxPagesReached { count: max }));
            }
        }

        let fetched = match self.session.as_ref() {
            Some(session) => session.get_page(&url),
            None => return Ok(false),
        };
        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                self.session = None;
                return Err(TableError::stage(e));
            }
        };
        self.pages_fetched += 1;
        debug!(url = %url, records = page.results.len(), page = self.pages_fetched, "Fetched page");

        self.pending.extend(page.results);
        self.next_url = page.next;
        Ok(true)
    }

    fn release(&mut self) -> etl_table::Result<()> {
        if let Some(session) = self.session.take() {
            session.close().map_err(TableError::stage)?;
            info!(pages = self.pages_fetched, "Finished page walk");
        }
        Ok(())
    }

    fn record_to_row(&self, mut record: JsonObject) -> etl_table::Result<Row> {
        if let Some(field) = record.keys().find(|k| !self.header.contains(k)) {
            return Err(TableError::stage(StarWarsError::UnexpectedField {
                field: field.clone(),
            }));
        }
        Ok(self
            .header
            .iter()
            .map(|name| record.remove(name).map_or(Value::Null, Value::from))
            .collect())
    }
}

impl<F: Fetch + ?Sized> Iterator for PageWalk<'_, F> {
    type Item = etl_table::Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(self.record_to_row(record));
            }
            match self.fetch_next_page() {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

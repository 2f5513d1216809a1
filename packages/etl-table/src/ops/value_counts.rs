use std::collections::HashMap;

use crate::error::Result;
use crate::header::Header;
use crate::table::{Row, Scan, Table};
use crate::value::Value;

/// Column holding the absolute count per combination.
pub const COUNT_FIELD: &str = "count";
/// Column holding the relative frequency per combination.
pub const FREQUENCY_FIELD: &str = "frequency";

/// Counts distinct value combinations of the given fields.
///
/// Emits one row per combination: the field values followed by `count` and
/// `frequency`. Most common combinations come first; equal counts keep the
/// order in which combinations were first seen.
pub struct ValueCounts<T> {
    inner: T,
    fields: Vec<String>,
}

impl<T: Table> ValueCounts<T> {
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

struct Group {
    first_seen: usize,
    count: usize,
}

impl<T: Table> Table for ValueCounts<T> {
    fn scan(&self) -> Result<Scan<'_>> {
        let upstream = self.inner.scan()?;
        let indices = self
            .fields
            .iter()
            .map(|f| upstream.header().require(f))
            .collect::<Result<Vec<_>>>()?;
        let header = Header::new(
            self.fields
                .iter()
                .map(String::as_str)
                .chain([COUNT_FIELD, FREQUENCY_FIELD]),
        )?;

        let mut groups: HashMap<Vec<Value>, Group> = HashMap::new();
        let mut total = 0usize;
        for row in upstream {
            let row = row?;
            let key: Vec<Value> = indices.iter().map(|&i| row[i].clone()).collect();
            let first_seen = groups.len();
            groups
                .entry(key)
                .or_insert(Group {
                    first_seen,
                    count: 0,
                })
                .count += 1;
            total += 1;
        }

        let mut groups: Vec<(Vec<Value>, Group)> = groups.into_iter().collect();
        groups.sort_by(|(_, a), (_, b)| {
            b.count
                .cmp(&a.count)
                .then(a.first_seen.cmp(&b.first_seen))
        });
        tracing::debug!(fields = ?self.fields, groups = groups.len(), rows = total, "Counted values");

        let rows: Vec<Row> = groups
            .into_iter()
            .map(|(mut key, group)| {
                key.push(Value::Int(group.count as i64));
                key.push(Value::Float(group.count as f64 / total as f64));
                key
            })
            .collect();
        Ok(Scan::from_rows(header, rows))
    }
}

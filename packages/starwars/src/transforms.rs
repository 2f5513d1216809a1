//! Stage chains applied to the people table.
//!
//! Extraction runs once per fetch and shapes what gets stored. Presentation
//! runs on a stored table each time it is viewed.

use etl_table::{BoxTable, Table, TableError, TableExt, Value, FREQUENCY_FIELD};
use swapi_client::Fetch;
use tracing::debug;

use crate::dates::datetime_string_to_date_string;
use crate::error::StarWarsError;
use crate::order::OrderBy;
use crate::resolver::PlanetResolver;

pub const EDITED_FIELD: &str = "edited";
pub const DATE_FIELD: &str = "date";
pub const HOMEWORLD_FIELD: &str = "homeworld";

/// Columns dropped before storage: nested collection references plus
/// bookkeeping URLs and timestamps.
pub const PEOPLE_CUTOUT_FIELDS: [&str; 7] = [
    "starships",
    "edited",
    "created",
    "vehicles",
    "films",
    "species",
    "url",
];

/// Append `date`, the calendar date of the `edited` timestamp.
///
/// A missing or null `edited` gives a null `date`. Anything else that is not
/// an ISO datetime string fails the scan with
/// [`StarWarsError::MalformedDate`].
pub fn add_date_for_edited<T: Table>(table: T) -> impl Table {
    table.add_field(DATE_FIELD, |record| {
        let date = match record.get(EDITED_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::Text(edited)) => {
                datetime_string_to_date_string(Some(edited.as_str())).map_err(TableError::stage)?
            }
            Some(other) => {
                return Err(TableError::stage(StarWarsError::MalformedDate {
                    value: other.to_string(),
                }))
            }
        };
        Ok(Value::from(date))
    })
}

/// Replace each `homeworld` URL with the planet's name.
///
/// Lookups go through `resolver`, so each distinct URL is fetched at most once
/// while it stays cached. Null, empty and non-text values become null. Fetch
/// errors abort the scan.
pub fn convert_homeworld_to_name<'a, T, F>(
    table: T,
    fetch: &'a F,
    resolver: &'a PlanetResolver,
) -> impl Table + 'a
where
    T: Table + 'a,
    F: Fetch + ?Sized + 'a,
{
    table.convert(HOMEWORLD_FIELD, move |value| match value {
        Value::Text(url) if !url.is_empty() => resolver
            .resolve(fetch, url)
            .map(Value::from)
            .map_err(TableError::stage),
        _ => Ok(Value::Null),
    })
}

pub fn cutout_people_columns<T: Table>(table: T) -> impl Table {
    table.cutout(PEOPLE_CUTOUT_FIELDS)
}

/// Extraction chain: date derivation, homeworld resolution, then pruning.
///
/// Pruning runs last because date derivation reads `edited`.
pub fn transform_extracted_people_table<'a, T, F>(
    table: T,
    fetch: &'a F,
    resolver: &'a PlanetResolver,
) -> impl Table + 'a
where
    T: Table + 'a,
    F: Fetch + ?Sized + 'a,
{
    let table = add_date_for_edited(table);
    let table = convert_homeworld_to_name(table, fetch, resolver);
    cutout_people_columns(table)
}

/// One row per distinct combination of `fields` with its `count`.
///
/// Repeated field names count once. Identity when `fields` is empty.
pub fn value_counts_without_frequency<'a, T: Table + 'a>(
    table: T,
    fields: &[String],
) -> BoxTable<'a> {
    if fields.is_empty() {
        return table.boxed();
    }
    let mut distinct: Vec<&String> = Vec::with_capacity(fields.len());
    for field in fields {
        if !distinct.contains(&field) {
            distinct.push(field);
        }
    }
    table
        .value_counts(distinct.into_iter().cloned())
        .cutout([FREQUENCY_FIELD])
        .boxed()
}

/// Stable sort by the ordering column.
///
/// Identity when `order_by` is `None` or its column is not in the header.
pub fn sort_by_order<'a, T: Table + 'a>(table: T, order_by: Option<&OrderBy>) -> BoxTable<'a> {
    match order_by {
        Some(order) => table
            .sort_by(order.column.clone(), order.direction)
            .skip_if_missing()
            .boxed(),
        None => table.boxed(),
    }
}

/// Keep the first `limit` rows. `None` and `Some(0)` keep everything.
pub fn limit_rows<'a, T: Table + 'a>(table: T, limit: Option<usize>) -> BoxTable<'a> {
    match limit {
        Some(limit) if limit > 0 => table.head(limit).boxed(),
        _ => table.boxed(),
    }
}

/// Inputs of the presentation chain. Every stage is skipped when its input
/// is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presentation {
    pub aggregate_by: Vec<String>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

/// Presentation chain: grouped counting, then sorting, then limiting.
pub fn transform_loaded_people_table<'a, T: Table + 'a>(
    table: T,
    presentation: &Presentation,
) -> BoxTable<'a> {
    debug!(
        aggregate_by = ?presentation.aggregate_by,
        order_by = ?presentation.order_by.as_ref().map(ToString::to_string),
        limit = ?presentation.limit,
        "Building presentation chain"
    );
    let table = value_counts_without_frequency(table, &presentation.aggregate_by);
    let table = sort_by_order(table, presentation.order_by.as_ref());
    limit_rows(table, presentation.limit)
}

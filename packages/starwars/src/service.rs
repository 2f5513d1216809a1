//! Fetch-and-store and load-and-present entry points.

use std::time::{Duration, Instant};

use etl_table::{to_csv_bytes, Row, Table};
use swapi_client::Fetch;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::query::DetailsQuery;
use crate::resolver::PlanetResolver;
use crate::source::PaginatedTable;
use crate::storage::{Dataset, DatasetStore};
use crate::transforms::{transform_extracted_people_table, transform_loaded_people_table};

/// Walk the people listing from `url`, run the extraction chain and encode
/// the result as CSV.
///
/// A listing without any record has no header, so the extraction chain
/// fails with `FieldNotFound` for `homeworld` instead of producing an empty
/// dataset.
pub fn fetch_table_csv<F: Fetch + ?Sized>(
    fetch: &F,
    resolver: &PlanetResolver,
    url: &str,
    max_pages: Option<usize>,
) -> Result<Vec<u8>> {
    let source = PaginatedTable::new(fetch, url).with_max_pages(max_pages);
    let table = transform_extracted_people_table(source, fetch, resolver);
    Ok(to_csv_bytes(&table)?)
}

/// A freshly stored dataset and how long fetching it took.
#[derive(Debug, Clone)]
pub struct FetchedDataset {
    pub dataset: Dataset,
    pub elapsed: Duration,
}

/// Fetch the configured listing and persist it as a new dataset.
///
/// Nothing is stored unless the whole walk succeeds.
pub fn fetch_dataset<F, S>(
    fetch: &F,
    resolver: &PlanetResolver,
    store: &S,
    config: &Config,
) -> Result<FetchedDataset>
where
    F: Fetch + ?Sized,
    S: DatasetStore + ?Sized,
{
    let started = Instant::now();
    info!(url = %config.fetch_url, "Fetching dataset");

    let csv = fetch_table_csv(fetch, resolver, &config.fetch_url, config.max_pages)?;
    let dataset = store.save(&csv)?;
    let elapsed = started.elapsed();

    info!(
        uuid = %dataset.uuid,
        elapsed_ms = elapsed.as_millis() as u64,
        cached_planets = resolver.len(),
        "Fetched dataset"
    );
    Ok(FetchedDataset { dataset, elapsed })
}

/// Everything needed to render one dataset view.
#[derive(Debug, Clone)]
pub struct DatasetDetails {
    pub dataset: Dataset,
    /// Columns of the stored table, selectable for grouping.
    pub available_fields: Vec<String>,
    pub query: DetailsQuery,
    pub header: Vec<String>,
    pub rows: Vec<Row>,
    pub next_limit: usize,
}

/// Load a stored dataset and apply the presentation chain for `query`.
pub fn dataset_details<S: DatasetStore + ?Sized>(
    store: &S,
    id: &str,
    query: DetailsQuery,
) -> Result<DatasetDetails> {
    let dataset = store.get(id)?;
    let table = store.load(&dataset)?;
    let available_fields = table.header()?.names().to_vec();

    let transformed = transform_loaded_people_table(&table, &query.presentation());
    let scan = transformed.scan()?;
    let header = scan.header().names().to_vec();
    let rows = scan.collect_rows()?;

    Ok(DatasetDetails {
        dataset,
        available_fields,
        next_limit: query.next_limit(),
        query,
        header,
        rows,
    })
}

//! Star Wars people datasets.
//!
//! Fetches the paginated people listing, shapes it through a lazy stage
//! chain, stores it as CSV and presents stored datasets with optional
//! grouping, ordering and limiting.
//!
//! # Usage
//!
//! ```rust,ignore
//! use starwars::{fetch_dataset, Config, FileDatasetStore, PlanetResolver};
//! use swapi_client::SwapiClient;
//!
//! let config = Config::from_env()?;
//! let client = SwapiClient::new().with_timeout(config.http_timeout);
//! let resolver = PlanetResolver::new(config.planet_cache_capacity);
//! let store = FileDatasetStore::new(&config.dataset_dir);
//!
//! let fetched = fetch_dataset(&client, &resolver, &store, &config)?;
//! println!("{} in {:?}", fetched.dataset.uuid, fetched.elapsed);
//! ```
//!
//! # Modules
//!
//! - [`source`] - lazy table over the page-chain
//! - [`resolver`] - cached planet name lookups
//! - [`transforms`] - extraction and presentation chains
//! - [`storage`] - persisted datasets
//! - [`service`] - fetch and details entry points

pub mod config;
pub mod dates;
pub mod error;
pub mod order;
pub mod query;
pub mod resolver;
pub mod service;
pub mod source;
pub mod storage;
pub mod transforms;

pub use config::Config;
pub use dates::datetime_string_to_date_string;
pub use error::{Result, StarWarsError};
pub use order::OrderBy;
pub use query::DetailsQuery;
pub use resolver::PlanetResolver;
pub use service::{dataset_details, fetch_dataset, fetch_table_csv, DatasetDetails, FetchedDataset};
pub use source::PaginatedTable;
pub use storage::{Dataset, DatasetStore, FileDatasetStore};
pub use transforms::{transform_extracted_people_table, transform_loaded_people_table, Presentation};

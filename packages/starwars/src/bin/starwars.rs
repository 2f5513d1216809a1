//! Star Wars dataset CLI
//!
//! Fetches people datasets from the Star Wars API and explores stored ones.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use etl_table::Row;
use starwars::{
    dataset_details, fetch_dataset, Config, DatasetStore, DetailsQuery, FileDatasetStore, OrderBy,
    PlanetResolver,
};
use swapi_client::SwapiClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "starwars")]
#[command(about = "Fetch and explore Star Wars people datasets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the people listing into a new dataset
    Fetch,

    /// List stored datasets, newest first
    List,

    /// Show a stored dataset
    Show {
        /// Dataset UUID
        uuid: String,

        /// Group by this field (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,

        /// Order by a column, `-` prefix for descending
        #[arg(long, allow_hyphen_values = true)]
        order_by: Option<String>,

        /// Number of rows to show
        #[arg(long)]
        limit: Option<usize>,

        /// Raw query string, e.g. "field=homeworld&order_by=-count"
        #[arg(long, conflicts_with_all = ["fields", "order_by", "limit"])]
        query: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,starwars=debug,swapi_client=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let store = FileDatasetStore::new(&config.dataset_dir);

    match cli.command {
        Commands::Fetch => fetch(&config, &store),
        Commands::List => list(&store),
        Commands::Show {
            uuid,
            fields,
            order_by,
            limit,
            query,
        } => {
            let query = match query {
                Some(raw) => DetailsQuery::parse(&raw, config.default_per_page),
                None => {
                    let mut query = DetailsQuery::new(config.default_per_page);
                    query.fields = fields;
                    query.order_by = order_by.as_deref().and_then(OrderBy::parse);
                    if let Some(limit) = limit {
                        query.limit = limit;
                    }
                    query
                }
            };
            show(&store, &uuid, query)
        }
    }
}

fn fetch(config: &Config, store: &FileDatasetStore) -> Result<()> {
    let mut client = SwapiClient::new().with_timeout(config.http_timeout);
    if let Some(token) = &config.swapi_token {
        client = client.with_token(token);
    }
    let resolver = PlanetResolver::new(config.planet_cache_capacity);

    match fetch_dataset(&client, &resolver, store, config) {
        Ok(fetched) => {
            println!(
                "Fetched dataset {} in {:.2}s",
                fetched.dataset.uuid,
                fetched.elapsed.as_secs_f64()
            );
            Ok(())
        }
        Err(e) if e.is_misuse() => anyhow::bail!("Internal error, session misuse: {e}"),
        Err(e) => anyhow::bail!("Could not fetch dataset: {e}"),
    }
}

fn list(store: &FileDatasetStore) -> Result<()> {
    let datasets = store.list().context("Failed to list datasets")?;
    if datasets.is_empty() {
        println!("No datasets yet. Run `starwars fetch` first.");
        return Ok(());
    }
    for dataset in datasets {
        println!(
            "{}  {}",
            dataset.uuid,
            dataset.date.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

fn show(store: &FileDatasetStore, uuid: &str, query: DetailsQuery) -> Result<()> {
    let details = dataset_details(store, uuid, query)?;

    println!("Dataset {}", details.dataset.uuid);
    println!("Fields: {}", details.available_fields.join(", "));
    println!();
    print_table(&details.header, &details.rows);
    if details.rows.len() >= details.query.limit && details.query.limit > 0 {
        println!();
        println!(
            "More: --query \"{}\"",
            details.query.with_limit(details.next_limit).to_query_string()
        );
    }
    Ok(())
}

fn print_table(header: &[String], rows: &[Row]) {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();
    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain([name.chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };
    println!("{}", line(header).trim_end());
    for row in &cells {
        println!("{}", line(row.as_slice()).trim_end());
    }
}

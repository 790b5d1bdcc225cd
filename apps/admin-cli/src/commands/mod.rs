//! Subcommand handlers. Each one loads what it needs from the store, runs
//! the core calculation and prints the result.

pub mod dashboard;
pub mod import;
pub mod orders;
pub mod price;
pub mod products;
pub mod settings;

use anyhow::{Context, Result};
use catalog_client::{CatalogClient, ClientConfig};

use crate::cli::{Cli, Command};

pub async fn run(cli: Cli, config: ClientConfig) -> Result<()> {
    let json = cli.json;

    match cli.command {
        Command::Price(args) => price::run(&args, json),
        Command::Dashboard => dashboard::run(&connect(&config)?, json).await,
        Command::Import {
            file,
            sheet,
            dry_run,
        } => {
            let options = import::ImportOptions {
                file,
                sheet,
                dry_run,
                max_rows: config.import.max_rows,
            };
            import::run(&connect(&config)?, &options, json).await
        }
        Command::Products { action } => products::run(&connect(&config)?, action, json).await,
        Command::Orders { action } => orders::run(&connect(&config)?, action, json).await,
        Command::Settings { action } => settings::run(&connect(&config)?, action, json).await,
    }
}

fn connect(config: &ClientConfig) -> Result<CatalogClient> {
    CatalogClient::from_config(config)
        .with_context(|| format!("connecting to {}", config.api.base_url))
}

/// Prints a value as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

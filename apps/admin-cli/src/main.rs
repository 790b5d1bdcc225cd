//! # catalog-admin
//!
//! Command-line admin for the catalog store.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          catalog-admin                                  │
//! │                                                                         │
//! │  argv ───► clap ───► ClientConfig ───► commands::run ───► stdout       │
//! │                      (file + env)            │                          │
//! │                                              ▼                          │
//! │                                     catalog-client (REST)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr so `--json` output stays clean. Set `RUST_LOG` to
//! change the filter (for example `RUST_LOG=catalog=debug`).

mod cli;
mod commands;
mod spreadsheet;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use catalog_client::ClientConfig;

use crate::cli::Cli;

const DEFAULT_LOG_FILTER: &str = "warn,catalog=info";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = ClientConfig::load(cli.config.clone()).context("loading configuration")?;
    debug!(base_url = %config.api.base_url, "Configuration loaded");

    commands::run(cli, config).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

//! # catalog-client: REST Access to the Catalog Store
//!
//! The only network boundary of the admin tools.
//!
//! ## Modules
//!
//! - [`client`] - [`CatalogClient`], one async method per endpoint
//! - [`config`] - [`ClientConfig`] loaded from TOML and environment
//! - [`error`] - [`ClientError`]
//!
//! ## Example
//! ```rust,no_run
//! use catalog_client::{CatalogClient, ClientConfig};
//!
//! # async fn run() -> catalog_client::ClientResult<()> {
//! let config = ClientConfig::load(None)?;
//! let client = CatalogClient::from_config(&config)?;
//!
//! let products = client.list_products().await?;
//! println!("{} products", products.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::CatalogClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};

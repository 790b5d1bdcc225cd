//! # catalog-core: Pure Business Logic for Catalog Admin
//!
//! The derived-field calculators and workflow state of the catalog admin
//! panel, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Admin Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  admin-cli (catalog-admin)                      │   │
//! │  │    dashboard ──► import ──► products ──► orders ──► settings   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ catalog-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │ dashboard │  │  import   │  │ bulk_edit │  │   │
//! │  │   │  margin   │  │   KPIs    │  │  aliases  │  │  patches  │  │   │
//! │  │   │  MRP disc │  │  buckets  │  │  preview  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   types • money • orders • catalog • settings • validation     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO LOGGING • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain records                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              catalog-client (REST to the catalog store)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Product, Order, Category, Customer, Vendor)
//! - [`money`] - Integer paise money type
//! - [`numeric`] - Explicit text-to-number parsing
//! - [`pricing`] - Purchase rate / margin / price / MRP discount derivation
//! - [`dashboard`] - Stock and order KPIs
//! - [`import`] - Spreadsheet row normalization and import preview
//! - [`bulk_edit`] - Multi-product edit sessions
//! - [`orders`] - Order entry, filtering and reports
//! - [`catalog`] - Product filtering, product form, category usage
//! - [`units`] - Unit presets and ordering
//! - [`settings`] - Typed feature flags
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: the clock is an argument wherever a result depends on it
//! 2. **No I/O**: network and file access live in catalog-client and admin-cli
//! 3. **Integer Money**: all monetary values are whole paise (i64)
//! 4. **Explicit Parsing**: text input becomes `Option`, the caller picks the default
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::money::Money;
//! use catalog_core::pricing::{PriceEdit, PriceFields};
//!
//! let fields = PriceFields::default()
//!     .with(PriceEdit::Mrp(Some(Money::from_major(200.0))))
//!     .with(PriceEdit::DiscountPercent(10.0))
//!     .with(PriceEdit::Discount(true));
//!
//! assert_eq!(fields.discount_amount, Money::from_major(20.0));
//! assert_eq!(fields.price, Money::from_major(180.0));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bulk_edit;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod import;
pub mod money;
pub mod numeric;
pub mod orders;
pub mod pricing;
pub mod settings;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Products with stock above zero but below this count as low stock.
pub const LOW_STOCK_THRESHOLD: f64 = 5.0;

/// Offset from a 0-based data row index to the sheet row number
/// (one header row, rows numbered from 1).
pub const HEADER_ROW_OFFSET: usize = 2;

/// Largest sheet accepted in one import.
pub const MAX_IMPORT_ROWS: usize = 5000;

/// Orders shown in the dashboard's recent list.
pub const RECENT_ORDERS: usize = 5;

/// Category given to imported rows without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Unit given to imported rows without one.
pub const DEFAULT_IMPORT_UNIT: &str = "Base Unit";

/// Unit a new product starts with in the product form.
pub const DEFAULT_FORM_UNIT: &str = "pcs";

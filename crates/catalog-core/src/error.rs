//! # Error Types
//!
//! Domain-specific error types for catalog-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core errors (this file)                                       │
//! │  ├── CoreError        - Workflow errors (import, bulk edit, orders)    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  catalog-client errors (separate crate)                                │
//! │  └── ClientError      - HTTP / decode / config failures                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → anyhow (CLI) → operator           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculators themselves never fail. Errors only come from workflow
//! steps that hand something to the store: a batch to import, an order to
//! submit, a set of bulk edits to save.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Workflow errors raised before anything is sent to the store.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The import preview holds no valid rows.
    ///
    /// ## User Workflow
    /// ```text
    /// Upload sheet (3 rows, all invalid)
    ///      │
    ///      ▼
    /// ImportPreview::batch()
    ///      │
    ///      ▼
    /// NothingToImport { total: 3, invalid: 3 }
    ///      │
    ///      ▼
    /// Operator fixes or removes rows, tries again
    /// ```
    #[error("Nothing to import: {invalid} of {total} rows are invalid")]
    NothingToImport { total: usize, invalid: usize },

    /// The uploaded sheet is larger than one import may be.
    #[error("Sheet has {rows} rows, at most {max} can be imported at once")]
    TooManyRows { rows: usize, max: usize },

    /// A bulk edit session is being saved without any edits.
    #[error("No changes made")]
    NoChanges,

    /// A bulk edit touched a field the operator did not select.
    #[error("Field {field} was not selected for bulk edit")]
    FieldNotSelected { field: String },

    /// A bulk edit referenced a product that is not in the session.
    #[error("Product not in bulk edit session: {0}")]
    ProductNotInSession(String),

    /// An order line index is out of range.
    #[error("Order line {index} does not exist (order has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },

    /// A settings key that does not name a known flag.
    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g. a phone number with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g. a product name that already exists).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

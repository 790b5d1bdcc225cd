//! # Bulk Row Normalizer
//!
//! Maps spreadsheet rows from assorted billing-software exports onto one
//! canonical product record.
//!
//! ## Column Aliases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field      Candidate columns (first non-empty wins)      Default       │
//! │  ─────────  ───────────────────────────────────────────   ───────────  │
//! │  name       Item name, Product, Name, item_name           ""            │
//! │  category   Category, Group, category                     "General"     │
//! │  price      Rate, Sale price                              0             │
//! │  mrp        MRP                                           none (also 0) │
//! │  stock      Stock, Qty                                    0             │
//! │  unit       Unit                                          "Base Unit"   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A row is valid when it has a name and a price above zero. Invalid rows
//! stay in the preview with their issues listed and are left out of the
//! batch sent to the store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::numeric::{parse_amount, parse_quantity};
use crate::types::Unit;
use crate::{DEFAULT_CATEGORY, DEFAULT_IMPORT_UNIT, HEADER_ROW_OFFSET};

// =============================================================================
// Cells & Rows
// =============================================================================

/// One spreadsheet cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    /// Empty cells, blank text and numeric zero all count as empty, so a
    /// later alias gets its turn.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Number(n) => *n == 0.0,
            Cell::Bool(_) => false,
        }
    }

    /// Cell content as text. Whole numbers print without a fraction.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) => text.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }

    /// Cell content as a number, if it is one or parses as one.
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(text) => parse_quantity(text),
            _ => None,
        }
    }

    pub fn as_amount(&self) -> Option<Money> {
        match self {
            Cell::Text(text) => parse_amount(text),
            other => other.as_decimal().map(Money::from_major),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// A raw spreadsheet row keyed by header text.
pub type RawRow = HashMap<String, Cell>;

// =============================================================================
// Aliases
// =============================================================================

/// Ordered candidate column names for one canonical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldAliases {
    pub field: &'static str,
    pub columns: &'static [&'static str],
}

impl FieldAliases {
    /// First non-empty cell among the candidate columns, in priority order.
    pub fn resolve<'a>(&self, row: &'a RawRow) -> Option<&'a Cell> {
        self.columns
            .iter()
            .filter_map(|column| row.get(*column))
            .find(|cell| !cell.is_empty())
    }
}

pub const NAME_COLUMNS: FieldAliases = FieldAliases {
    field: "name",
    columns: &["Item name", "Product", "Name", "item_name"],
};

pub const CATEGORY_COLUMNS: FieldAliases = FieldAliases {
    field: "category",
    columns: &["Category", "Group", "category"],
};

pub const PRICE_COLUMNS: FieldAliases = FieldAliases {
    field: "price",
    columns: &["Rate", "Sale price"],
};

pub const MRP_COLUMNS: FieldAliases = FieldAliases {
    field: "mrp",
    columns: &["MRP"],
};

pub const STOCK_COLUMNS: FieldAliases = FieldAliases {
    field: "stock",
    columns: &["Stock", "Qty"],
};

pub const UNIT_COLUMNS: FieldAliases = FieldAliases {
    field: "unit",
    columns: &["Unit"],
};

// =============================================================================
// Normalized Rows
// =============================================================================

/// Why a row cannot be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RowIssue {
    MissingName,
    MissingPrice,
    /// The price cell holds text that is not a number.
    UnparsablePrice(String),
}

impl std::fmt::Display for RowIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowIssue::MissingName => write!(f, "name is missing"),
            RowIssue::MissingPrice => write!(f, "price must be above zero"),
            RowIssue::UnparsablePrice(raw) => write!(f, "price '{}' is not a number", raw),
        }
    }
}

/// A spreadsheet row after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportRow {
    /// Sheet row number as the operator sees it (header is row 1).
    pub row_number: usize,
    pub valid: bool,
    pub issues: Vec<RowIssue>,
    pub name: String,
    pub category_name: String,
    #[ts(as = "f64")]
    pub price: Money,
    #[ts(as = "Option<f64>")]
    pub mrp: Option<Money>,
    pub stock: f64,
    pub units: Vec<Unit>,
    pub availability: bool,
}

impl ImportRow {
    /// The record sent to the store for this row.
    pub fn to_bulk_product(&self) -> BulkProduct {
        BulkProduct {
            name: self.name.clone(),
            category_name: self.category_name.clone(),
            price: self.price,
            mrp: self.mrp,
            stock: self.stock,
            units: self.units.clone(),
            availability: self.availability,
        }
    }
}

/// Normalizes one raw row. `index` is the 0-based data row position in the
/// sheet, header excluded.
pub fn normalize_row(row: &RawRow, index: usize) -> ImportRow {
    let mut issues = Vec::new();

    let name = NAME_COLUMNS.resolve(row).map(Cell::as_text).unwrap_or_default();
    if name.is_empty() {
        issues.push(RowIssue::MissingName);
    }

    let category_name = CATEGORY_COLUMNS
        .resolve(row)
        .map(Cell::as_text)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let price = match PRICE_COLUMNS.resolve(row) {
        Some(cell) => match cell.as_amount() {
            Some(price) => price,
            None => {
                issues.push(RowIssue::UnparsablePrice(cell.as_text()));
                Money::zero()
            }
        },
        None => Money::zero(),
    };
    let unparsable = issues
        .iter()
        .any(|i| matches!(i, RowIssue::UnparsablePrice(_)));
    if !price.is_positive() && !unparsable {
        issues.push(RowIssue::MissingPrice);
    }

    let mrp = MRP_COLUMNS
        .resolve(row)
        .and_then(Cell::as_amount)
        .filter(|mrp| !mrp.is_zero());

    let stock = STOCK_COLUMNS
        .resolve(row)
        .and_then(Cell::as_decimal)
        .unwrap_or(0.0);

    let unit_name = UNIT_COLUMNS
        .resolve(row)
        .map(Cell::as_text)
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_IMPORT_UNIT.to_string());

    ImportRow {
        row_number: index + HEADER_ROW_OFFSET,
        valid: issues.is_empty(),
        issues,
        name,
        category_name,
        price,
        mrp,
        stock,
        units: vec![Unit::base(unit_name)],
        availability: stock > 0.0,
    }
}

// =============================================================================
// Preview & Batch
// =============================================================================

/// One product in the bulk create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BulkProduct {
    pub name: String,
    pub category_name: String,
    #[ts(as = "f64")]
    pub price: Money,
    #[ts(as = "Option<f64>")]
    pub mrp: Option<Money>,
    pub stock: f64,
    pub units: Vec<Unit>,
    pub availability: bool,
}

/// Body of `POST /api/products/bulk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BulkImportRequest {
    pub products: Vec<BulkProduct>,
}

/// The store's answer to a bulk import: how many products it created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BulkImportResult {
    #[serde(default)]
    pub success: usize,
}

/// The operator's view of an uploaded sheet.
///
/// ## User Workflow
/// ```text
/// Upload sheet ──► ImportPreview::build ──► review rows (invalid flagged)
///                                                │
///                        remove(i) ◄─────────────┤
///                                                ▼
///                                     batch() ──► POST /api/products/bulk
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportPreview {
    pub rows: Vec<ImportRow>,
}

impl ImportPreview {
    /// Normalizes contiguous data rows, numbering them by position. Sheets
    /// with more than `max_rows` rows are rejected up front.
    pub fn build(rows: &[RawRow], max_rows: usize) -> CoreResult<Self> {
        Self::build_indexed(rows.iter().enumerate(), max_rows)
    }

    /// Same as [`ImportPreview::build`] for readers that skip rows (blank
    /// lines): each row carries its own data row index so row numbers match
    /// the sheet.
    pub fn build_indexed<'a>(
        rows: impl ExactSizeIterator<Item = (usize, &'a RawRow)>,
        max_rows: usize,
    ) -> CoreResult<Self> {
        if rows.len() > max_rows {
            return Err(CoreError::TooManyRows {
                rows: rows.len(),
                max: max_rows,
            });
        }

        Ok(ImportPreview {
            rows: rows.map(|(index, row)| normalize_row(row, index)).collect(),
        })
    }

    /// Drops a row from the preview. Row numbers of the others are unchanged.
    pub fn remove(&mut self, index: usize) -> Option<ImportRow> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn valid_rows(&self) -> impl Iterator<Item = &ImportRow> {
        self.rows.iter().filter(|row| row.valid)
    }

    pub fn invalid_rows(&self) -> impl Iterator<Item = &ImportRow> {
        self.rows.iter().filter(|row| !row.valid)
    }

    pub fn valid_count(&self) -> usize {
        self.valid_rows().count()
    }

    pub fn invalid_count(&self) -> usize {
        self.len() - self.valid_count()
    }

    /// The bulk request for every valid row.
    pub fn batch(&self) -> CoreResult<BulkImportRequest> {
        let products: Vec<BulkProduct> =
            self.valid_rows().map(ImportRow::to_bulk_product).collect();

        if products.is_empty() {
            return Err(CoreError::NothingToImport {
                total: self.len(),
                invalid: self.invalid_count(),
            });
        }

        Ok(BulkImportRequest { products })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

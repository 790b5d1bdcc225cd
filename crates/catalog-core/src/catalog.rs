//! # Catalog Helpers
//!
//! Product list filtering, the product form and category bookkeeping.
//!
//! ## Product Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ProductDraft (form state)                                              │
//! │       │                                                                 │
//! │       ├── name trimmed, non-empty           ──► ValidationError        │
//! │       ├── price > 0                         ──► ValidationError        │
//! │       ├── name not used by another product  ──► Duplicate              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductPayload { availability = stock > 0, units or [pcs] }           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  POST /api/products   or   PUT /api/products/{id}                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Category, Product, Unit};
use crate::units::unit_from_name;
use crate::validation::{validate_multiplier, validate_price, validate_product_name, validate_stock};
use crate::DEFAULT_FORM_UNIT;

// =============================================================================
// Filtering
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageFilter {
    #[default]
    Any,
    With,
    Without,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StockFilter {
    #[default]
    Any,
    InStock,
    OutOfStock,
}

/// Product list filter. Every criterion left at its default matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub search: String,
    pub category_id: Option<String>,
    pub images: ImageFilter,
    pub stock: StockFilter,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let search = self.search.trim().to_lowercase();
        if !search.is_empty() && !product.name.to_lowercase().contains(&search) {
            return false;
        }

        if let Some(category_id) = &self.category_id {
            if product.category_id.as_ref() != Some(category_id) {
                return false;
            }
        }

        let images_ok = match self.images {
            ImageFilter::Any => true,
            ImageFilter::With => product.has_images(),
            ImageFilter::Without => !product.has_images(),
        };

        let stock_ok = match self.stock {
            StockFilter::Any => true,
            StockFilter::InStock => product.is_in_stock(),
            StockFilter::OutOfStock => product.is_out_of_stock(),
        };

        images_ok && stock_ok
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

// =============================================================================
// Names & Categories
// =============================================================================

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Another product already using `name` (trimmed, case-insensitive).
/// `exclude_id` is the product being edited.
pub fn find_duplicate_name<'a>(
    products: &'a [Product],
    name: &str,
    exclude_id: Option<&str>,
) -> Option<&'a Product> {
    let wanted = normalize_name(name);
    if wanted.is_empty() {
        return None;
    }

    products
        .iter()
        .filter(|p| Some(p.id.as_str()) != exclude_id)
        .find(|p| normalize_name(&p.name) == wanted)
}

/// Products filed under a category. A category in use should not be
/// deleted without moving them first.
pub fn category_usage<'a>(products: &'a [Product], category_id: &str) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| p.category_id.as_deref() == Some(category_id))
        .collect()
}

/// Display name of a category id, falling back to "Uncategorized".
pub fn category_name<'a>(categories: &'a [Category], category_id: Option<&str>) -> &'a str {
    category_id
        .and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.name.as_str())
        .unwrap_or("Uncategorized")
}

// =============================================================================
// Product Form
// =============================================================================

/// Body of `POST /api/products` and `PUT /api/products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPayload {
    pub name: String,
    pub category_id: Option<String>,
    #[ts(as = "f64")]
    pub price: Money,
    pub stock: f64,
    pub availability: bool,
    pub units: Vec<Unit>,
    pub images: Vec<String>,
}

/// Product form state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    /// Set when editing an existing product.
    pub id: Option<String>,
    pub name: String,
    pub category_id: Option<String>,
    pub price: Money,
    pub stock: f64,
    pub units: Vec<Unit>,
    pub images: Vec<String>,
}

impl ProductDraft {
    /// Form state for editing a product.
    pub fn edit(product: &Product) -> Self {
        ProductDraft {
            id: Some(product.id.clone()),
            name: product.name.clone(),
            category_id: product.category_id.clone(),
            price: product.price,
            stock: product.stock,
            units: product.units.clone(),
            images: product.images.clone(),
        }
    }

    /// Validates the form against the current product list and builds the
    /// request body.
    pub fn to_payload(&self, existing: &[Product]) -> CoreResult<ProductPayload> {
        let name = validate_product_name(&self.name)?;
        validate_price(self.price)?;
        validate_stock(self.stock)?;

        if find_duplicate_name(existing, &name, self.id.as_deref()).is_some() {
            return Err(ValidationError::Duplicate {
                field: "product name".to_string(),
                value: name,
            }
            .into());
        }

        let units = if self.units.is_empty() {
            vec![unit_from_name(DEFAULT_FORM_UNIT)]
        } else {
            for unit in &self.units {
                validate_multiplier(unit.multiplier)?;
            }
            self.units.clone()
        };

        Ok(ProductPayload {
            name,
            category_id: self.category_id.clone().filter(|id| !id.trim().is_empty()),
            price: self.price,
            stock: self.stock,
            availability: self.stock > 0.0,
            units,
            images: self.images.clone(),
        })
    }
}

/// Quick in/out toggle from the product list: out of stock goes to 1,
/// anything in stock goes to 0.
pub fn toggled_stock(product: &Product) -> f64 {
    if product.is_in_stock() {
        0.0
    } else {
        1.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn product(id: &str, name: &str, category: Option<&str>, stock: f64, images: usize) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            category_id: category.map(str::to_string),
            stock,
            images: vec!["https://img".to_string(); images],
            ..Product::default()
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Basmati Rice", Some("grains"), 10.0, 1),
            product("2", "Sona Rice", Some("grains"), 0.0, 0),
            product("3", "Green Tea", Some("drinks"), 3.0, 0),
        ]
    }

    #[test]
    fn test_filter_by_search_and_category() {
        let products = catalog();
        let filter = ProductFilter {
            search: "RICE".to_string(),
            ..ProductFilter::default()
        };
        assert_eq!(filter.apply(&products).len(), 2);

        let filter = ProductFilter {
            category_id: Some("drinks".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(filter.apply(&products)[0].name, "Green Tea");
    }

    #[test]
    fn test_filter_by_images_and_stock() {
        let products = catalog();
        let filter = ProductFilter {
            images: ImageFilter::Without,
            stock: StockFilter::InStock,
            ..ProductFilter::default()
        };
        let hits = filter.apply(&products);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "3");

        let filter = ProductFilter {
            stock: StockFilter::OutOfStock,
            ..ProductFilter::default()
        };
        assert_eq!(filter.apply(&products)[0].id, "2");
    }

    #[test]
    fn test_duplicate_name() {
        let products = catalog();
        assert!(find_duplicate_name(&products, "  basmati rice ", None).is_some());
        assert!(find_duplicate_name(&products, "Basmati Rice", Some("1")).is_none());
        assert!(find_duplicate_name(&products, "Jasmine Rice", None).is_none());
        assert!(find_duplicate_name(&products, "  ", None).is_none());
    }

    #[test]
    fn test_category_usage_and_name() {
        let products = catalog();
        assert_eq!(category_usage(&products, "grains").len(), 2);
        assert!(category_usage(&products, "snacks").is_empty());

        let categories = vec![Category {
            id: "grains".to_string(),
            name: "Grains".to_string(),
        }];
        assert_eq!(category_name(&categories, Some("grains")), "Grains");
        assert_eq!(category_name(&categories, None), "Uncategorized");
    }

    #[test]
    fn test_draft_payload() {
        let draft = ProductDraft {
            name: "  Toor Dal ".to_string(),
            category_id: Some(String::new()),
            price: Money::from_major(120.0),
            stock: 4.0,
            ..ProductDraft::default()
        };
        let payload = draft.to_payload(&catalog()).unwrap();

        assert_eq!(payload.name, "Toor Dal");
        assert_eq!(payload.category_id, None);
        assert!(payload.availability);
        assert_eq!(payload.units, vec![Unit::base("pcs")]);
    }

    #[test]
    fn test_draft_rejects_bad_input() {
        let products = catalog();

        let draft = ProductDraft {
            name: "Tea".to_string(),
            ..ProductDraft::default()
        };
        assert!(draft.to_payload(&products).is_err());

        let draft = ProductDraft {
            name: "green tea".to_string(),
            price: Money::from_major(10.0),
            ..ProductDraft::default()
        };
        assert!(matches!(
            draft.to_payload(&products),
            Err(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));
    }

    #[test]
    fn test_editing_keeps_own_name() {
        let products = catalog();
        let mut draft = ProductDraft::edit(&products[2]);
        draft.price = Money::from_major(35.0);
        draft.stock = 0.0;

        let payload = draft.to_payload(&products).unwrap();
        assert_eq!(payload.name, "Green Tea");
        assert!(!payload.availability);
    }

    #[test]
    fn test_toggled_stock() {
        let products = catalog();
        assert_eq!(toggled_stock(&products[0]), 0.0);
        assert_eq!(toggled_stock(&products[1]), 1.0);
    }
}

//! # Bulk Edit Session
//!
//! Edits a chosen set of fields across several products at once and
//! collects the changes as one partial update per product.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. Pick products and fields (pricing, stock, vendor, ...)              │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  2. BulkEditSession::start(all_products, ids, fields)                   │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  3. edit_*(id, value)   local copy updated, ProductPatch grows          │
//! │          │              pricing edits go through PriceFields            │
//! │          ▼                                                              │
//! │  4. patches()  ──► [(id, patch)]  ──► PUT /api/products/{id} each      │
//! │                    NoChanges if nothing was edited                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{PriceEdit, PriceFields};
use crate::types::{Product, Unit};

// =============================================================================
// Fields
// =============================================================================

/// A group of product fields that can be bulk edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkEditField {
    Pricing,
    Stock,
    Vendor,
    Category,
    Name,
    Units,
}

impl BulkEditField {
    pub const ALL: [BulkEditField; 6] = [
        BulkEditField::Pricing,
        BulkEditField::Stock,
        BulkEditField::Vendor,
        BulkEditField::Category,
        BulkEditField::Name,
        BulkEditField::Units,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BulkEditField::Pricing => "pricing",
            BulkEditField::Stock => "stock",
            BulkEditField::Vendor => "vendor",
            BulkEditField::Category => "category",
            BulkEditField::Name => "name",
            BulkEditField::Units => "units",
        }
    }
}

impl std::fmt::Display for BulkEditField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BulkEditField {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        BulkEditField::ALL
            .into_iter()
            .find(|field| field.as_str() == key)
            .ok_or_else(|| crate::error::ValidationError::NotAllowed {
                field: "bulk edit field".to_string(),
                allowed: BulkEditField::ALL.iter().map(|f| f.to_string()).collect(),
            })
    }
}

// =============================================================================
// Patch
// =============================================================================

/// Partial product update. Only fields that were touched are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<f64>")]
    pub purchase_rate: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<f64>")]
    pub price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<f64>")]
    pub mrp: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<f64>")]
    pub discount_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Vec<Unit>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == ProductPatch::default()
    }

    /// Patch that sets stock and the availability derived from it.
    pub fn stock(stock: f64) -> Self {
        ProductPatch {
            stock: Some(stock),
            availability: Some(stock > 0.0),
            ..ProductPatch::default()
        }
    }

    /// Records every price field that differs between `before` and `after`.
    fn record_prices(&mut self, before: &PriceFields, after: &PriceFields) {
        if before.purchase_rate != after.purchase_rate {
            self.purchase_rate = Some(after.purchase_rate);
        }
        if before.margin_percent != after.margin_percent {
            self.margin_percentage = Some(after.margin_percent);
        }
        if before.price != after.price {
            self.price = Some(after.price);
        }
        if before.mrp != after.mrp {
            // A cleared MRP goes out as zero.
            self.mrp = Some(after.mrp.unwrap_or_default());
        }
        if before.discount_percent != after.discount_percent {
            self.discount_percentage = Some(after.discount_percent);
        }
        if before.discount_amount != after.discount_amount {
            self.discount_amount = Some(after.discount_amount);
        }
        if before.discount_enabled != after.discount_enabled {
            self.discount_enabled = Some(after.discount_enabled);
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Local bulk edit state over a snapshot of the selected products.
#[derive(Debug, Clone, Default)]
pub struct BulkEditSession {
    fields: HashSet<BulkEditField>,
    products: Vec<Product>,
    changes: Vec<ProductPatch>,
}

impl BulkEditSession {
    pub fn new(products: Vec<Product>, fields: impl IntoIterator<Item = BulkEditField>) -> Self {
        let changes = vec![ProductPatch::default(); products.len()];
        BulkEditSession {
            fields: fields.into_iter().collect(),
            products,
            changes,
        }
    }

    /// Starts a session over the products with the given ids, keeping the
    /// store's order.
    pub fn start(
        all: &[Product],
        ids: &[String],
        fields: impl IntoIterator<Item = BulkEditField>,
    ) -> Self {
        let selected = all
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect();
        Self::new(selected, fields)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_selected(&self, field: BulkEditField) -> bool {
        self.fields.contains(&field)
    }

    pub fn has_changes(&self) -> bool {
        self.changes.iter().any(|patch| !patch.is_empty())
    }

    pub fn edit_name(&mut self, id: &str, name: &str) -> CoreResult<()> {
        let (product, patch) = self.slot(id, BulkEditField::Name)?;
        product.name = name.to_string();
        patch.name = Some(name.to_string());
        Ok(())
    }

    pub fn edit_category(&mut self, id: &str, category_id: &str) -> CoreResult<()> {
        let (product, patch) = self.slot(id, BulkEditField::Category)?;
        product.category_id = Some(category_id.to_string());
        patch.category_id = Some(category_id.to_string());
        Ok(())
    }

    pub fn edit_vendor(&mut self, id: &str, vendor_id: &str) -> CoreResult<()> {
        let (product, patch) = self.slot(id, BulkEditField::Vendor)?;
        product.vendor_id = Some(vendor_id.to_string());
        patch.vendor_id = Some(vendor_id.to_string());
        Ok(())
    }

    /// Sets stock; availability follows.
    pub fn edit_stock(&mut self, id: &str, stock: f64) -> CoreResult<()> {
        crate::validation::validate_stock(stock)?;
        let (product, patch) = self.slot(id, BulkEditField::Stock)?;
        product.stock = stock;
        product.availability = stock > 0.0;
        patch.stock = Some(stock);
        patch.availability = Some(product.availability);
        Ok(())
    }

    pub fn edit_units(&mut self, id: &str, units: Vec<Unit>) -> CoreResult<()> {
        for unit in &units {
            crate::validation::validate_multiplier(unit.multiplier)?;
        }
        let (product, patch) = self.slot(id, BulkEditField::Units)?;
        product.units = units.clone();
        patch.units = Some(units);
        Ok(())
    }

    /// Applies a price edit through the pricing calculator and records the
    /// fields it changed.
    pub fn edit_price(&mut self, id: &str, edit: PriceEdit) -> CoreResult<()> {
        let (product, patch) = self.slot(id, BulkEditField::Pricing)?;
        let before = PriceFields::from_product(product);
        let after = before.with(edit);
        after.apply_to_product(product);
        patch.record_prices(&before, &after);
        Ok(())
    }

    /// One patch per edited product, in session order.
    pub fn patches(&self) -> CoreResult<Vec<(String, ProductPatch)>> {
        let patches: Vec<(String, ProductPatch)> = self
            .products
            .iter()
            .zip(&self.changes)
            .filter(|(_, patch)| !patch.is_empty())
            .map(|(product, patch)| (product.id.clone(), patch.clone()))
            .collect();

        if patches.is_empty() {
            return Err(CoreError::NoChanges);
        }
        Ok(patches)
    }

    fn slot(
        &mut self,
        id: &str,
        field: BulkEditField,
    ) -> CoreResult<(&mut Product, &mut ProductPatch)> {
        if !self.fields.contains(&field) {
            return Err(CoreError::FieldNotSelected {
                field: field.to_string(),
            });
        }

        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotInSession(id.to_string()))?;

        Ok((&mut self.products[index], &mut self.changes[index]))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, purchase: f64, margin: f64) -> Product {
        let mut p = Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            ..Product::default()
        };
        PriceFields::default()
            .with(PriceEdit::PurchaseRate(Money::from_major(purchase)))
            .with(PriceEdit::Margin(margin))
            .apply_to_product(&mut p);
        p
    }

    fn session(fields: &[BulkEditField]) -> BulkEditSession {
        let all = vec![
            product("a", 100.0, 20.0),
            product("b", 50.0, 10.0),
            product("c", 10.0, 0.0),
        ];
        BulkEditSession::start(&all, &["a".to_string(), "b".to_string()], fields.iter().copied())
    }

    #[test]
    fn test_start_selects_products() {
        let session = session(&[BulkEditField::Stock]);
        let ids: Vec<_> = session.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(!session.has_changes());
    }

    #[test]
    fn test_no_changes() {
        let session = session(&[BulkEditField::Stock]);
        assert!(matches!(session.patches(), Err(CoreError::NoChanges)));
    }

    #[test]
    fn test_unselected_field_rejected() {
        let mut session = session(&[BulkEditField::Stock]);
        assert!(matches!(
            session.edit_name("a", "New"),
            Err(CoreError::FieldNotSelected { .. })
        ));
        assert!(matches!(
            session.edit_stock("c", 3.0),
            Err(CoreError::ProductNotInSession(_))
        ));
    }

    #[test]
    fn test_stock_edit_sets_availability() {
        let mut session = session(&[BulkEditField::Stock]);
        session.edit_stock("b", 0.0).unwrap();
        session.edit_stock("a", 7.0).unwrap();

        let patches = session.patches().unwrap();
        assert_eq!(patches.len(), 2);
        assert_eq!(patches[0].0, "a");
        assert_eq!(patches[0].1, ProductPatch::stock(7.0));
        assert_eq!(patches[1].1.availability, Some(false));
    }

    #[test]
    fn test_purchase_edit_updates_price() {
        let mut session = session(&[BulkEditField::Pricing]);
        session
            .edit_price("a", PriceEdit::PurchaseRate(Money::from_major(200.0)))
            .unwrap();

        let patches = session.patches().unwrap();
        let patch = &patches[0].1;
        assert_eq!(patch.purchase_rate, Some(Money::from_major(200.0)));
        assert_eq!(patch.price, Some(Money::from_major(240.0)));
        assert_eq!(patch.margin_percentage, None);
        assert_eq!(session.products()[0].price, Money::from_major(240.0));
    }

    #[test]
    fn test_sales_edit_updates_margin() {
        let mut session = session(&[BulkEditField::Pricing]);
        session
            .edit_price("a", PriceEdit::Price(Money::from_major(150.0)))
            .unwrap();

        let patch = &session.patches().unwrap()[0].1;
        assert_eq!(patch.margin_percentage, Some(50.0));
        assert_eq!(patch.purchase_rate, None);
    }

    #[test]
    fn test_patch_serializes_only_touched_fields() {
        let mut session = session(&[BulkEditField::Name, BulkEditField::Vendor]);
        session.edit_name("a", "Rice").unwrap();
        session.edit_vendor("a", "v1").unwrap();

        let (_, patch) = &session.patches().unwrap()[0];
        let json = serde_json::to_value(patch).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Rice", "vendor_id": "v1"}));
    }

    #[test]
    fn test_category_and_units_edits() {
        let mut session = session(&[BulkEditField::Category, BulkEditField::Units]);
        assert!(session.is_selected(BulkEditField::Units));
        assert!(!session.is_selected(BulkEditField::Pricing));

        session.edit_category("b", "cat-2").unwrap();
        let units = vec![Unit::base("box"), Unit::new("pcs", 0.1)];
        session.edit_units("b", units.clone()).unwrap();
        assert!(session.edit_units("a", vec![Unit::new("bad", 0.0)]).is_err());

        assert_eq!(session.products()[1].category_id.as_deref(), Some("cat-2"));
        let patches = session.patches().unwrap();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].0, "b");
        assert_eq!(patches[0].1.category_id.as_deref(), Some("cat-2"));
        assert_eq!(patches[0].1.units, Some(units));
    }

    #[test]
    fn test_field_names() {
        assert_eq!("Pricing".parse::<BulkEditField>().unwrap(), BulkEditField::Pricing);
        assert!("colour".parse::<BulkEditField>().is_err());
    }
}

//! # Orders
//!
//! Order entry, list filtering and the two order reports.
//!
//! ## Order Entry Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrderDraft::new()                                                      │
//! │       │                                                                 │
//! │       ├── set_customer(id)                                              │
//! │       ├── add_product(&product)   price + primary unit copied, qty 1   │
//! │       ├── set_quantity(i, qty)                                          │
//! │       ├── remove_line(i)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  submit() ──► NewOrder { customer_id, items, total } ──► POST /api/orders│
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reports
//! Both reports keep the order in which customers or products first appear
//! in the order list.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Order, OrderItem, OrderStatus, Product};
use crate::validation::validate_quantity;

// =============================================================================
// Order Draft
// =============================================================================

/// An order being put together by the operator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    customer_id: Option<String>,
    lines: Vec<OrderItem>,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrder {
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    #[ts(as = "f64")]
    pub total: Money,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_customer(&mut self, customer_id: impl Into<String>) {
        let id = customer_id.into();
        self.customer_id = (!id.trim().is_empty()).then_some(id);
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    pub fn lines(&self) -> &[OrderItem] {
        &self.lines
    }

    /// Adds a line for the product at its current price, in its primary
    /// unit, quantity 1. Returns the new line's index.
    pub fn add_product(&mut self, product: &Product) -> usize {
        self.lines.push(OrderItem {
            product_id: product.id.clone(),
            product_name: Some(product.name.clone()),
            qty: 1.0,
            unit_name: product
                .primary_unit()
                .map(|unit| unit.name.clone())
                .unwrap_or_default(),
            price: product.price,
        });
        self.lines.len() - 1
    }

    pub fn set_quantity(&mut self, index: usize, qty: f64) -> CoreResult<()> {
        validate_quantity(qty)?;
        let line = self.line_mut(index)?;
        line.qty = qty;
        Ok(())
    }

    /// Overrides the price on one line.
    pub fn set_price(&mut self, index: usize, price: Money) -> CoreResult<()> {
        let line = self.line_mut(index)?;
        line.price = price;
        Ok(())
    }

    pub fn remove_line(&mut self, index: usize) -> CoreResult<OrderItem> {
        if index >= self.lines.len() {
            return Err(CoreError::LineOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    /// Σ qty × price over the lines.
    pub fn grand_total(&self) -> Money {
        self.lines.iter().map(OrderItem::line_total).sum()
    }

    /// Builds the create request. Needs a customer and at least one line,
    /// and every line must reference a product.
    pub fn submit(&self) -> CoreResult<NewOrder> {
        let customer_id = self
            .customer_id
            .clone()
            .ok_or_else(|| ValidationError::Required {
                field: "customer".to_string(),
            })?;

        if self.lines.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }

        if self.lines.iter().any(|line| line.product_id.trim().is_empty()) {
            return Err(ValidationError::Required {
                field: "product".to_string(),
            }
            .into());
        }

        Ok(NewOrder {
            customer_id,
            items: self.lines.clone(),
            total: self.grand_total(),
        })
    }

    fn line_mut(&mut self, index: usize) -> CoreResult<&mut OrderItem> {
        let len = self.lines.len();
        self.lines
            .get_mut(index)
            .ok_or(CoreError::LineOutOfRange { index, len })
    }
}

// =============================================================================
// Status & Filtering
// =============================================================================

/// Body of `PUT /api/orders/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Order list filter. Empty search matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Case-insensitive substring of the customer name.
    pub search: String,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        let search = self.search.trim().to_lowercase();
        if !search.is_empty() {
            let name = order.customer_name.as_deref().unwrap_or_default();
            if !name.to_lowercase().contains(&search) {
                return false;
            }
        }

        self.status.map_or(true, |status| order.status == status)
    }

    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|order| self.matches(order)).collect()
    }
}

// =============================================================================
// Reports
// =============================================================================

/// All lines ordered by one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PartyEntry {
    pub customer: String,
    pub items: Vec<OrderItem>,
}

/// One customer's quantity of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemLine {
    pub customer: String,
    pub qty: f64,
    pub unit: String,
}

/// Who ordered one product, and how much.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemEntry {
    pub product: String,
    pub lines: Vec<ItemLine>,
}

impl ItemEntry {
    /// Total quantity per unit name, in first-appearance order.
    pub fn totals_by_unit(&self) -> Vec<(String, f64)> {
        let mut totals: Vec<(String, f64)> = Vec::new();
        for line in &self.lines {
            match totals.iter_mut().find(|(unit, _)| *unit == line.unit) {
                Some((_, qty)) => *qty += line.qty,
                None => totals.push((line.unit.clone(), line.qty)),
            }
        }
        totals
    }
}

fn customer_label(order: &Order) -> String {
    order
        .customer_name
        .clone()
        .unwrap_or_else(|| order.customer_id.clone())
}

fn product_label(item: &OrderItem) -> String {
    item.product_name
        .clone()
        .unwrap_or_else(|| item.product_id.clone())
}

/// Customer → every line they ordered. Customers whose orders have no
/// lines still get an (empty) entry.
pub fn party_report(orders: &[Order]) -> Vec<PartyEntry> {
    let mut report: Vec<PartyEntry> = Vec::new();

    for order in orders {
        let customer = customer_label(order);
        let index = match report.iter().position(|entry| entry.customer == customer) {
            Some(index) => index,
            None => {
                report.push(PartyEntry {
                    customer,
                    items: Vec::new(),
                });
                report.len() - 1
            }
        };
        report[index].items.extend(order.items.iter().cloned());
    }

    report
}

/// Product → (customer, qty, unit) for every line naming it.
pub fn item_report(orders: &[Order]) -> Vec<ItemEntry> {
    let mut report: Vec<ItemEntry> = Vec::new();

    for order in orders {
        for item in &order.items {
            let product = product_label(item);
            let line = ItemLine {
                customer: customer_label(order),
                qty: item.qty,
                unit: item.unit_name.clone(),
            };

            match report.iter_mut().find(|entry| entry.product == product) {
                Some(entry) => entry.lines.push(line),
                None => report.push(ItemEntry {
                    product,
                    lines: vec![line],
                }),
            }
        }
    }

    report
}

/// Plain-text order slip for printing or sharing.
pub fn order_slip(order: &Order) -> String {
    let mut slip = format!("ORDER SLIP\n\nCustomer: {}\n\n", customer_label(order));
    for (i, item) in order.items.iter().enumerate() {
        slip.push_str(&format!(
            "{}) {} - {} {}\n",
            i + 1,
            product_label(item),
            item.qty,
            item.unit_name
        ));
    }
    slip.push_str(&format!("\nTotal: {}", order.total));
    slip
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Unit;

    fn product(id: &str, name: &str, price: f64, unit: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price: Money::from_major(price),
            units: vec![Unit::base(unit)],
            ..Product::default()
        }
    }

    fn item(product: &str, qty: f64, unit: &str) -> OrderItem {
        OrderItem {
            product_id: product.to_lowercase(),
            product_name: Some(product.to_string()),
            qty,
            unit_name: unit.to_string(),
            price: Money::from_major(10.0),
        }
    }

    fn order(customer: &str, status: OrderStatus, items: Vec<OrderItem>) -> Order {
        Order {
            customer_name: Some(customer.to_string()),
            status,
            items,
            ..Order::default()
        }
    }

    #[test]
    fn test_draft_lines_and_total() {
        let mut draft = OrderDraft::new();
        draft.set_customer("c1");
        let rice = draft.add_product(&product("p1", "Rice", 50.0, "kg"));
        draft.add_product(&product("p2", "Soap", 25.5, "pcs"));
        draft.set_quantity(rice, 2.5).unwrap();

        assert_eq!(draft.lines()[0].unit_name, "kg");
        assert_eq!(draft.lines()[1].qty, 1.0);
        assert_eq!(draft.grand_total(), Money::from_major(150.5));

        let order = draft.submit().unwrap();
        assert_eq!(order.customer_id, "c1");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total, Money::from_major(150.5));
    }

    #[test]
    fn test_draft_price_override() {
        let mut draft = OrderDraft::new();
        draft.set_customer("c1");
        let soap = draft.add_product(&product("p2", "Soap", 25.5, "pcs"));
        draft.set_quantity(soap, 4.0).unwrap();
        draft.set_price(soap, Money::from_major(22.0)).unwrap();

        assert_eq!(draft.lines()[soap].price, Money::from_major(22.0));
        assert_eq!(draft.grand_total(), Money::from_major(88.0));
        assert!(matches!(
            draft.set_price(5, Money::from_major(1.0)),
            Err(CoreError::LineOutOfRange { index: 5, len: 1 })
        ));
        assert_eq!(draft.submit().unwrap().total, Money::from_major(88.0));
    }

    #[test]
    fn test_draft_requires_customer_and_items() {
        let mut draft = OrderDraft::new();
        draft.add_product(&product("p1", "Rice", 50.0, "kg"));
        assert!(matches!(
            draft.submit(),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let mut draft = OrderDraft::new();
        draft.set_customer("c1");
        assert!(draft.submit().is_err());

        draft.set_customer("  ");
        assert_eq!(draft.customer_id(), None);
    }

    #[test]
    fn test_draft_line_errors() {
        let mut draft = OrderDraft::new();
        draft.add_product(&product("p1", "Rice", 50.0, "kg"));

        assert!(matches!(
            draft.remove_line(3),
            Err(CoreError::LineOutOfRange { index: 3, len: 1 })
        ));
        assert!(draft.set_quantity(0, 0.0).is_err());
        assert!(draft.set_quantity(7, 1.0).is_err());

        draft.remove_line(0).unwrap();
        assert!(draft.lines().is_empty());
        assert!(draft.grand_total().is_zero());
    }

    #[test]
    fn test_new_order_wire_shape() {
        let mut draft = OrderDraft::new();
        draft.set_customer("c1");
        draft.add_product(&product("p1", "Rice", 50.0, "kg"));
        let json = serde_json::to_value(draft.submit().unwrap()).unwrap();

        assert_eq!(json["customer_id"], "c1");
        assert_eq!(json["total"], 50);
        assert_eq!(json["items"][0]["qty"], 1.0);
        assert_eq!(json["items"][0]["unit_name"], "kg");
    }

    #[test]
    fn test_order_filter() {
        let orders = vec![
            order("Anu Stores", OrderStatus::Pending, vec![]),
            order("Balaji Traders", OrderStatus::Packed, vec![]),
            order("anand mart", OrderStatus::Packed, vec![]),
        ];

        let filter = OrderFilter {
            search: "AN".to_string(),
            status: None,
        };
        assert_eq!(filter.apply(&orders).len(), 2);

        let filter = OrderFilter {
            search: "an".to_string(),
            status: Some(OrderStatus::Packed),
        };
        let hits = filter.apply(&orders);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].customer_name.as_deref(), Some("anand mart"));

        assert_eq!(OrderFilter::default().apply(&orders).len(), 3);
    }

    #[test]
    fn test_party_report_preserves_first_appearance() {
        let orders = vec![
            order("Zed", OrderStatus::Pending, vec![item("Rice", 1.0, "kg")]),
            order("Amy", OrderStatus::Pending, vec![item("Tea", 2.0, "pcs")]),
            order("Zed", OrderStatus::Pending, vec![item("Dal", 3.0, "kg")]),
        ];
        let report = party_report(&orders);

        let customers: Vec<_> = report.iter().map(|e| e.customer.as_str()).collect();
        assert_eq!(customers, ["Zed", "Amy"]);
        assert_eq!(report[0].items.len(), 2);
    }

    #[test]
    fn test_item_report() {
        let orders = vec![
            order(
                "Zed",
                OrderStatus::Pending,
                vec![item("Rice", 1.0, "kg"), item("Tea", 1.0, "pcs")],
            ),
            order("Amy", OrderStatus::Pending, vec![item("Rice", 2.5, "kg")]),
        ];
        let report = item_report(&orders);

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].product, "Rice");
        assert_eq!(report[0].lines[1].customer, "Amy");
        assert_eq!(report[0].totals_by_unit(), vec![("kg".to_string(), 3.5)]);
    }

    #[test]
    fn test_order_slip() {
        let mut o = order("Amy", OrderStatus::Pending, vec![item("Rice", 2.0, "kg")]);
        o.total = Money::from_major(20.0);
        let slip = order_slip(&o);

        assert!(slip.contains("Customer: Amy"));
        assert!(slip.contains("1) Rice - 2 kg"));
        assert!(slip.ends_with("Total: ₹20.00"));
    }
}

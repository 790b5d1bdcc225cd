//! # Domain Types
//!
//! Records exchanged with the remote catalog store.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │    Category     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  purchase_rate  │   │  customer_id    │   │  id, name       │       │
//! │  │  margin %       │   │  items[]        │   └─────────────────┘       │
//! │  │  price, mrp     │   │  total          │   ┌─────────────────┐       │
//! │  │  discount       │   │  status         │   │ Customer/Vendor │       │
//! │  │  stock, units[] │   │  created_at     │   │  ─────────────  │       │
//! │  └─────────────────┘   └─────────────────┘   │  contact fields │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! Every entity is owned by the store. The panel holds transient copies and
//! mutates them locally until an explicit save round-trip.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::numeric::lenient_f64;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Unit
// =============================================================================

/// A selling unit. The multiplier converts one of these into base units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Unit {
    pub name: String,
    pub multiplier: f64,
}

impl Unit {
    pub fn new(name: impl Into<String>, multiplier: f64) -> Self {
        Unit {
            name: name.into(),
            multiplier,
        }
    }

    /// A unit with multiplier 1.
    pub fn base(name: impl Into<String>) -> Self {
        Unit::new(name, 1.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product as stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct Product {
    pub id: String,

    pub name: String,

    pub category_id: Option<String>,

    pub vendor_id: Option<String>,

    /// Cost from the vendor.
    #[ts(as = "f64")]
    pub purchase_rate: Money,

    /// Markup over purchase rate, in percent.
    #[serde(deserialize_with = "lenient_f64")]
    pub margin_percentage: f64,

    /// Sales rate.
    #[ts(as = "f64")]
    pub price: Money,

    /// Maximum retail price, the ceiling before discount.
    #[ts(as = "Option<f64>")]
    pub mrp: Option<Money>,

    #[serde(deserialize_with = "lenient_f64")]
    pub discount_percentage: f64,

    #[ts(as = "f64")]
    pub discount_amount: Money,

    /// Whether the MRP discount currently drives `price`.
    pub discount_enabled: bool,

    /// Quantity on hand in the primary unit.
    #[serde(deserialize_with = "lenient_f64")]
    pub stock: f64,

    /// Derived from stock on every save.
    pub availability: bool,

    /// Ordered; the first entry is the primary unit.
    pub units: Vec<Unit>,

    /// Public image URLs.
    pub images: Vec<String>,
}

impl Product {
    /// First unit in the list, if any.
    pub fn primary_unit(&self) -> Option<&Unit> {
        self.units.first()
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0.0
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0.0
    }

    /// In stock, but below the low-stock threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock > 0.0 && self.stock < LOW_STOCK_THRESHOLD
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    /// Value of the stock on hand at the sales rate.
    pub fn stock_value(&self) -> Money {
        self.price.times(self.stock)
    }
}

// =============================================================================
// Category / Customer / Vendor
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub mobile: String,
    /// Delivery route the customer is served on.
    pub route: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Body for creating or renaming a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryPayload {
    pub name: String,
}

/// Body for creating or updating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerPayload {
    pub name: String,
    pub mobile: String,
    pub route: String,
}

/// Body for creating or updating a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VendorPayload {
    pub name: String,
    pub phone: String,
    pub address: String,
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Taken, not yet packed.
    #[default]
    Pending,
    /// Packed, waiting for delivery.
    Packed,
    /// Delivered.
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Packed,
        OrderStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Packed => "packed",
            OrderStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "packed" => Ok(OrderStatus::Packed),
            "completed" => Ok(OrderStatus::Completed),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: OrderStatus::ALL.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// One line of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct OrderItem {
    pub product_id: String,

    /// Filled in by the store when listing orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    #[serde(alias = "quantity", deserialize_with = "lenient_f64")]
    pub qty: f64,

    pub unit_name: String,

    /// Unit price at the time of ordering.
    #[ts(as = "f64")]
    pub price: Money,
}

impl OrderItem {
    pub fn line_total(&self) -> Money {
        self.price.times(self.qty)
    }
}

/// An order as listed by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct Order {
    pub id: String,

    pub customer_id: String,

    /// Joined in by the store when listing orders.
    pub customer_name: Option<String>,

    #[serde(rename = "order_items", alias = "items")]
    pub items: Vec<OrderItem>,

    #[ts(as = "f64")]
    pub total: Money,

    pub status: OrderStatus,

    /// Timestamp as the store sent it. Epoch milliseconds are turned into
    /// RFC 3339; values of any other shape read as `None`.
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<String>,
}

impl Order {
    /// Sum of qty × price over the lines.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Local calendar day the order was created on, if the timestamp parses.
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(parse_local_date)
    }
}

/// Reads `created_at` without ever failing the surrounding record.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    deserializer.deserialize_any(LenientTimestamp)
}

struct LenientTimestamp;

impl LenientTimestamp {
    fn from_millis(ms: i64) -> Option<String> {
        DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.to_rfc3339())
    }
}

impl<'de> Visitor<'de> for LenientTimestamp {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a timestamp string, epoch milliseconds or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Self::from_millis(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(i64::try_from(v).ok().and_then(Self::from_millis))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Ok(None);
        }
        Ok(Self::from_millis(v.round() as i64))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(LenientTimestamp)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

/// Parses a store timestamp into a local calendar date.
///
/// Accepts RFC 3339 (converted to the local zone), naive date-times (taken
/// as local wall time) and bare dates.
pub fn parse_local_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.date());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

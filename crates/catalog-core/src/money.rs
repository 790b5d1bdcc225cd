//! # Money Module
//!
//! Provides the `Money` type for every rupee amount in the catalog.
//!
//! ## Why Integer Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The catalog store speaks JSON numbers:                                 │
//! │    "price": 0.1 + 0.2  →  0.30000000000000004                          │
//! │                                                                         │
//! │  Summing hundreds of stock values or order totals as f64 drifts.       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹120.50 is stored as 12050 paise                                    │
//! │    Percentages are applied once and rounded to the nearest paisa       │
//! │    Sums are exact                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The backend stores rupees as plain numbers (`"price": 120.5`), sometimes
//! as numeric strings (`"price": "120.50"`) and sometimes `null`. `Money`
//! serializes as a decimal rupee amount and deserializes from all three.
//!
//! ## Usage
//! ```rust
//! use catalog_core::money::Money;
//!
//! let rate = Money::from_paise(12050); // ₹120.50
//! let line = rate.times(3.0);          // ₹361.50
//! assert_eq!(line.paise(), 36150);
//!
//! let discount = Money::from_major(200.0).percent(10.0);
//! assert_eq!(discount, Money::from_major(20.0));
//! ```

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use crate::numeric::parse_decimal;

// =============================================================================
// Money Type
// =============================================================================

/// A rupee amount in paise (1/100 rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values show up as price corrections
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Custom serde**: decimal rupees on the wire, paise in memory
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.purchase_rate ──► PriceFields ──► Product.price               │
/// │                                 │                                       │
/// │  Product.mrp ───────────────────┘ (discount)                           │
/// │                                                                         │
/// │  Product.price × stock ──► DashboardKpis.total_stock_value             │
/// │  OrderItem.price × qty ──► Order.total ──► today / month revenue       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ```rust
    /// use catalog_core::money::Money;
    ///
    /// let price = Money::from_paise(1099); // ₹10.99
    /// assert_eq!(price.paise(), 1099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from a decimal rupee amount, rounded to the
    /// nearest paisa (half away from zero).
    ///
    /// This is the only bridge from floating point. It is used at the
    /// boundary: parsed form input, spreadsheet cells, JSON numbers.
    ///
    /// ```rust
    /// use catalog_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(120.5).paise(), 12050);
    /// assert_eq!(Money::from_major(0.125).paise(), 13);
    /// ```
    pub fn from_major(rupees: f64) -> Self {
        if !rupees.is_finite() {
            return Money::zero();
        }
        Money((rupees * 100.0).round() as i64)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the value as decimal rupees (for display and the wire only).
    #[inline]
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whole rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns `pct` percent of this amount, rounded to the nearest paisa.
    ///
    /// ## User Workflow
    /// ```text
    /// MRP: ₹200.00, Discount: 10%
    ///      │
    ///      ▼
    /// percent(10.0) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Discount amount: ₹20.00 → Sales price ₹180.00
    /// ```
    pub fn percent(&self, pct: f64) -> Money {
        self.times(pct / 100.0)
    }

    /// Multiplies by a (possibly fractional) quantity, rounded to the
    /// nearest paisa.
    ///
    /// ```rust
    /// use catalog_core::money::Money;
    ///
    /// let per_kg = Money::from_major(80.0);
    /// assert_eq!(per_kg.times(0.25), Money::from_major(20.0));
    /// ```
    pub fn times(&self, qty: f64) -> Money {
        let scaled = self.0 as f64 * qty;
        if !scaled.is_finite() {
            return Money::zero();
        }
        Money(scaled.round() as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money the way the admin panel prints it: `₹120.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Add and Sub saturate at the i64 bounds.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Serde
// =============================================================================

/// Whole rupees go out as integers (`120`), the rest as decimals (`120.5`).
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.0 / 100)
        } else {
            serializer.serialize_f64(self.to_major())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a rupee amount as a number, numeric string or null")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Ok(Money(v.saturating_mul(100)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map(|v| Money(v.saturating_mul(100)))
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Ok(Money::from_major(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        if v.trim().is_empty() {
            return Ok(Money::zero());
        }
        parse_decimal(v)
            .map(Money::from_major)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::zero())
    }

    fn visit_none<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::zero())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Money, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

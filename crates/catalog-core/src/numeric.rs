//! # Numeric Input Parsing
//!
//! Every number that enters the system as text (form fields, spreadsheet
//! cells, query arguments) is parsed here. Parsers return `Option`; the
//! caller picks the default explicitly instead of a silent `0`.
//!
//! ```text
//! "120.50"   ──► Some(120.5)
//! " 1,250 "  ──► Some(1250.0)     thousands separators are dropped
//! "₹99"      ──► Some(99.0)       a leading rupee sign is dropped
//! ""         ──► None
//! "abc"      ──► None
//! ```

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

use crate::money::Money;

/// Parses a decimal number, tolerating surrounding whitespace, a rupee sign
/// and thousands separators. Non-finite results are rejected.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('₹').unwrap_or(trimmed).trim_start();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a rupee amount.
pub fn parse_amount(raw: &str) -> Option<Money> {
    parse_decimal(raw).map(Money::from_major)
}

/// Parses a percentage, rounded to 2 decimals.
pub fn parse_percent(raw: &str) -> Option<f64> {
    parse_decimal(raw).map(round2)
}

/// Parses a stock or order quantity.
pub fn parse_quantity(raw: &str) -> Option<f64> {
    parse_decimal(raw)
}

/// Rounds to 2 decimal places (half away from zero).
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Serde Helper
// =============================================================================

/// Deserializes an `f64` the way the store sends quantities and
/// percentages: numbers, numeric strings or `null` (read as 0).
///
/// ```rust
/// #[derive(serde::Deserialize)]
/// struct Row {
///     #[serde(deserialize_with = "catalog_core::numeric::lenient_f64")]
///     stock: f64,
/// }
///
/// let row: Row = serde_json::from_str(r#"{"stock": "12.5"}"#).unwrap();
/// assert_eq!(row.stock, 12.5);
/// ```
pub fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    deserializer.deserialize_any(LenientF64)
}

struct LenientF64;

impl<'de> Visitor<'de> for LenientF64 {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, numeric string or null")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        if v.trim().is_empty() {
            return Ok(0.0);
        }
        parse_decimal(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_none<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(LenientF64)
    }
}

//! # Validation Module
//!
//! Input validation for records the panel sends to the store.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Parsing (numeric module)                                     │
//! │  └── Text → number, explicit default on failure                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rules before a save round-trip                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote store                                                 │
//! │  └── Its own constraints; rejections surface as ClientError::Status   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::money::Money;
//! use catalog_core::validation::{validate_price, validate_product_name};
//!
//! validate_product_name("Basmati Rice 5kg").unwrap();
//! validate_price(Money::from_major(52.5)).unwrap();
//! assert!(validate_price(Money::zero()).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a product name and returns it trimmed.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_product_name;
///
/// assert_eq!(validate_product_name("  Rice ").unwrap(), "Rice");
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_name("name", name)
}

pub fn validate_category_name(name: &str) -> ValidationResult<String> {
    validate_name("category name", name)
}

pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    validate_name("customer name", name)
}

pub fn validate_vendor_name(name: &str) -> ValidationResult<String> {
    validate_name("vendor name", name)
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (no filtering)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates a phone or mobile number. Empty is allowed.
///
/// ## Rules
/// - Digits, spaces, hyphens and a leading `+` only
/// - Between 7 and 15 digits
pub fn validate_phone(field: &str, phone: &str) -> ValidationResult<String> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Ok(String::new());
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only digits, spaces and hyphens".to_string(),
        });
    }

    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !(7..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must have between 7 and 15 digits".to_string(),
        });
    }

    Ok(phone.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sales price.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock figure. Zero is allowed (out of stock).
pub fn validate_stock(stock: f64) -> ValidationResult<()> {
    if !stock.is_finite() || stock < 0.0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates an order line quantity.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Order: change quantity                                                 │
/// │                                                                         │
/// │  Operator enters quantity: 2.5                                         │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(2.5) ← THIS FUNCTION                                │
/// │       │                                                                 │
/// │       ├── qty <= 0 or NaN? → Error: "quantity must be positive"        │
/// │       │                                                                 │
/// │       └── OK → line total recalculated                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: f64) -> ValidationResult<()> {
    if !qty.is_finite() || qty <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit multiplier.
pub fn validate_multiplier(multiplier: f64) -> ValidationResult<()> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "unit multiplier".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

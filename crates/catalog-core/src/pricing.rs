//! # Pricing Calculator
//!
//! Keeps purchase rate, margin and sales price consistent while the operator
//! edits any one of them, and applies the optional MRP discount.
//!
//! ## Derivation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Price Field Derivation                           │
//! │                                                                         │
//! │  edit purchase_rate ─┐                                                  │
//! │                      ├──► price = purchase × (1 + margin / 100)        │
//! │  edit margin % ──────┘                                                  │
//! │                                                                         │
//! │  edit price ─────────────► margin = (price − purchase) / purchase × 100│
//! │                            (0 when purchase is 0)                       │
//! │                                                                         │
//! │  mrp + discount on ──────► discount_amount = mrp × discount / 100      │
//! │                            price = mrp − discount_amount               │
//! │                            margin re-derived from the new price        │
//! │                                                                         │
//! │  discount off ───────────► price = mrp, discount_amount = 0            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The last edit wins: a margin edit after a discount recomputes price from
//! purchase rate even if the discount is still switched on.
//!
//! Money is rounded to whole paise and percentages to 2 decimals on every
//! edit. There are no error conditions; text input that does not parse is
//! applied as 0 (see [`PriceEdit::from_input`]).
//!
//! ## Example
//! ```rust
//! use catalog_core::money::Money;
//! use catalog_core::pricing::{PriceEdit, PriceFields};
//!
//! let mut fields = PriceFields::default();
//! fields.apply(PriceEdit::PurchaseRate(Money::from_major(100.0)));
//! fields.apply(PriceEdit::Margin(20.0));
//! assert_eq!(fields.price, Money::from_major(120.0));
//!
//! fields.apply(PriceEdit::Price(Money::from_major(150.0)));
//! assert_eq!(fields.margin_percent, 50.0);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::numeric::{parse_amount, parse_percent, round2};
use crate::types::Product;

// =============================================================================
// Price Fields
// =============================================================================

/// The mutually derivable price fields of one product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceFields {
    #[ts(as = "f64")]
    pub purchase_rate: Money,
    pub margin_percent: f64,
    #[ts(as = "f64")]
    pub price: Money,
    #[ts(as = "Option<f64>")]
    pub mrp: Option<Money>,
    pub discount_percent: f64,
    #[ts(as = "f64")]
    pub discount_amount: Money,
    pub discount_enabled: bool,
}

/// One operator edit to a price field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceEdit {
    PurchaseRate(Money),
    Margin(f64),
    Price(Money),
    /// `None` clears the MRP.
    Mrp(Option<Money>),
    DiscountPercent(f64),
    /// Switches the MRP discount on or off.
    Discount(bool),
}

/// Which text field an edit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    PurchaseRate,
    Margin,
    Price,
    Mrp,
    DiscountPercent,
}

impl PriceEdit {
    /// Builds an edit from raw text input.
    ///
    /// Parsing is explicit: a value that does not parse becomes 0 for the
    /// numeric fields, and a blank or non-positive MRP clears the MRP.
    pub fn from_input(field: PriceField, raw: &str) -> PriceEdit {
        match field {
            PriceField::PurchaseRate => {
                PriceEdit::PurchaseRate(parse_amount(raw).unwrap_or_default())
            }
            PriceField::Margin => PriceEdit::Margin(parse_percent(raw).unwrap_or(0.0)),
            PriceField::Price => PriceEdit::Price(parse_amount(raw).unwrap_or_default()),
            PriceField::Mrp => PriceEdit::Mrp(parse_amount(raw).filter(Money::is_positive)),
            PriceField::DiscountPercent => {
                PriceEdit::DiscountPercent(parse_percent(raw).unwrap_or(0.0))
            }
        }
    }
}

impl PriceFields {
    /// Reads the price fields of a product.
    pub fn from_product(product: &Product) -> Self {
        PriceFields {
            purchase_rate: product.purchase_rate,
            margin_percent: product.margin_percentage,
            price: product.price,
            mrp: product.mrp,
            discount_percent: product.discount_percentage,
            discount_amount: product.discount_amount,
            discount_enabled: product.discount_enabled,
        }
    }

    /// Writes the price fields back into a product.
    pub fn apply_to_product(&self, product: &mut Product) {
        product.purchase_rate = self.purchase_rate;
        product.margin_percentage = self.margin_percent;
        product.price = self.price;
        product.mrp = self.mrp;
        product.discount_percentage = self.discount_percent;
        product.discount_amount = self.discount_amount;
        product.discount_enabled = self.discount_enabled;
    }

    /// Applies one edit and re-derives the dependent fields.
    pub fn apply(&mut self, edit: PriceEdit) {
        match edit {
            PriceEdit::PurchaseRate(rate) => {
                self.purchase_rate = rate;
                self.derive_price();
            }
            PriceEdit::Margin(margin) => {
                self.margin_percent = round2(margin);
                self.derive_price();
            }
            PriceEdit::Price(price) => {
                self.price = price;
                self.derive_margin();
            }
            PriceEdit::Mrp(mrp) => {
                self.mrp = mrp;
                self.refresh_discount();
            }
            PriceEdit::DiscountPercent(pct) => {
                self.discount_percent = round2(pct);
                self.refresh_discount();
            }
            PriceEdit::Discount(true) => {
                self.discount_enabled = true;
                self.refresh_discount();
            }
            PriceEdit::Discount(false) => {
                self.discount_enabled = false;
                self.discount_amount = Money::zero();
                if let Some(mrp) = self.mrp {
                    self.price = mrp;
                    self.derive_margin();
                }
            }
        }
    }

    /// Convenience for chained edits in tests and scripts.
    pub fn with(mut self, edit: PriceEdit) -> Self {
        self.apply(edit);
        self
    }

    /// Whether the MRP discount is currently what sets the price.
    pub fn is_discounted(&self) -> bool {
        self.discount_enabled && self.mrp.is_some()
    }

    fn derive_price(&mut self) {
        self.price = self.purchase_rate.times(1.0 + self.margin_percent / 100.0);
    }

    fn derive_margin(&mut self) {
        self.margin_percent = if self.purchase_rate.is_positive() {
            let gain = (self.price - self.purchase_rate).paise() as f64;
            round2(gain / self.purchase_rate.paise() as f64 * 100.0)
        } else {
            0.0
        };
    }

    fn refresh_discount(&mut self) {
        if !self.discount_enabled {
            return;
        }
        match self.mrp {
            Some(mrp) => {
                self.discount_amount = mrp.percent(self.discount_percent);
                self.price = mrp - self.discount_amount;
                self.derive_margin();
            }
            None => self.discount_amount = Money::zero(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rupees(v: f64) -> Money {
        Money::from_major(v)
    }

    #[test]
    fn test_purchase_and_margin_derive_price() {
        let fields = PriceFields::default()
            .with(PriceEdit::PurchaseRate(rupees(100.0)))
            .with(PriceEdit::Margin(20.0));
        assert_eq!(fields.price, rupees(120.0));

        let fields = fields.with(PriceEdit::PurchaseRate(rupees(250.0)));
        assert_eq!(fields.price, rupees(300.0));
    }

    #[test]
    fn test_price_edit_derives_margin() {
        let fields = PriceFields::default()
            .with(PriceEdit::PurchaseRate(rupees(100.0)))
            .with(PriceEdit::Margin(20.0))
            .with(PriceEdit::Price(rupees(150.0)));
        assert_eq!(fields.margin_percent, 50.0);
    }

    #[test]
    fn test_price_edit_without_purchase_rate_zeroes_margin() {
        let fields = PriceFields::default()
            .with(PriceEdit::Margin(15.0))
            .with(PriceEdit::Price(rupees(80.0)));
        assert_eq!(fields.price, rupees(80.0));
        assert_eq!(fields.margin_percent, 0.0);
    }

    #[test]
    fn test_margin_is_rounded_to_two_decimals() {
        let fields = PriceFields::default()
            .with(PriceEdit::PurchaseRate(rupees(3.0)))
            .with(PriceEdit::Price(rupees(4.0)));
        assert_eq!(fields.margin_percent, 33.33);
    }

    #[test]
    fn test_mrp_discount_and_reset() {
        let fields = PriceFields::default()
            .with(PriceEdit::Mrp(Some(rupees(200.0))))
            .with(PriceEdit::DiscountPercent(10.0))
            .with(PriceEdit::Discount(true));
        assert_eq!(fields.discount_amount, rupees(20.0));
        assert_eq!(fields.price, rupees(180.0));
        assert!(fields.is_discounted());

        let fields = fields.with(PriceEdit::Discount(false));
        assert_eq!(fields.price, rupees(200.0));
        assert!(fields.discount_amount.is_zero());
        assert!(!fields.is_discounted());
    }

    #[test]
    fn test_discount_refreshes_margin() {
        let fields = PriceFields::default()
            .with(PriceEdit::PurchaseRate(rupees(150.0)))
            .with(PriceEdit::Mrp(Some(rupees(200.0))))
            .with(PriceEdit::DiscountPercent(10.0))
            .with(PriceEdit::Discount(true));
        assert_eq!(fields.price, rupees(180.0));
        assert_eq!(fields.margin_percent, 20.0);
    }

    #[test]
    fn test_discount_without_mrp_leaves_price() {
        let fields = PriceFields::default()
            .with(PriceEdit::Price(rupees(90.0)))
            .with(PriceEdit::DiscountPercent(10.0))
            .with(PriceEdit::Discount(true));
        assert_eq!(fields.price, rupees(90.0));
        assert!(fields.discount_amount.is_zero());
    }

    #[test]
    fn test_mrp_edit_while_discount_off_keeps_price() {
        let fields = PriceFields::default()
            .with(PriceEdit::Price(rupees(90.0)))
            .with(PriceEdit::Mrp(Some(rupees(120.0))));
        assert_eq!(fields.price, rupees(90.0));
    }

    #[test]
    fn test_from_input_parses_explicitly() {
        assert_eq!(
            PriceEdit::from_input(PriceField::PurchaseRate, "100"),
            PriceEdit::PurchaseRate(rupees(100.0))
        );
        assert_eq!(
            PriceEdit::from_input(PriceField::Margin, "abc"),
            PriceEdit::Margin(0.0)
        );
        assert_eq!(
            PriceEdit::from_input(PriceField::Price, ""),
            PriceEdit::Price(Money::zero())
        );
        assert_eq!(PriceEdit::from_input(PriceField::Mrp, "0"), PriceEdit::Mrp(None));
        assert_eq!(
            PriceEdit::from_input(PriceField::Mrp, "250"),
            PriceEdit::Mrp(Some(rupees(250.0)))
        );
    }

    /// purchase → margin → price → margin stays within rounding tolerance.
    #[test]
    fn test_round_trip_is_stable() {
        let purchases = [10.0, 37.5, 99.99, 100.0, 1234.56];
        let margins = [0.0, 5.0, 12.5, 20.0, 33.33, 87.65, 150.0];

        for purchase in purchases {
            for margin in margins {
                let forward = PriceFields::default()
                    .with(PriceEdit::PurchaseRate(rupees(purchase)))
                    .with(PriceEdit::Margin(margin));

                let expected = rupees(purchase * (1.0 + margin / 100.0));
                assert!(
                    (forward.price - expected).abs().paise() <= 1,
                    "price for {purchase} @ {margin}%"
                );

                let back = forward.with(PriceEdit::Price(forward.price));
                assert!(
                    (back.margin_percent - margin).abs() <= 0.06,
                    "margin for {purchase} @ {margin}% came back as {}",
                    back.margin_percent
                );

                // A 2-decimal margin can only pin the price to within
                // purchase × 0.005%.
                let again = back.with(PriceEdit::Margin(back.margin_percent));
                let drift = (again.price - forward.price).abs().paise() as f64;
                assert!(drift <= purchase * 100.0 * 0.00005 + 1.0);
            }
        }
    }

    #[test]
    fn test_product_bridge() {
        let mut product = Product {
            purchase_rate: rupees(40.0),
            margin_percentage: 25.0,
            price: rupees(50.0),
            ..Product::default()
        };

        let fields = PriceFields::from_product(&product).with(PriceEdit::Margin(50.0));
        fields.apply_to_product(&mut product);

        assert_eq!(product.price, rupees(60.0));
        assert_eq!(product.margin_percentage, 50.0);
    }
}

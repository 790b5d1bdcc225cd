//! # Feature Settings
//!
//! Global flags that switch optional product and customer features on and
//! off for every client of the store.
//!
//! ## Keys
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  product_features   enable_stock, enable_vendor,                        │
//! │                     enable_purchase_rate, enable_multiple_units         │
//! │  customer_features  enable_customer_login, enable_coupons,              │
//! │                     enable_customer_discount                            │
//! │  ui                 show_out_of_stock, show_product_images              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store persists each flag by its dotted key. A toggle is sent as
//! `{ key, value }`; the panel refreshes the whole map afterwards.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ProductFeatures {
    pub enable_stock: bool,
    pub enable_vendor: bool,
    pub enable_purchase_rate: bool,
    pub enable_multiple_units: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CustomerFeatures {
    pub enable_customer_login: bool,
    pub enable_coupons: bool,
    pub enable_customer_discount: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct UiSettings {
    pub show_out_of_stock: bool,
    pub show_product_images: bool,
}

/// The full settings map as the store returns it. Missing sections and
/// flags read as off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct AdminSettings {
    pub product_features: ProductFeatures,
    pub customer_features: CustomerFeatures,
    pub ui: UiSettings,
}

/// One toggleable flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingFlag {
    EnableStock,
    EnableVendor,
    EnablePurchaseRate,
    EnableMultipleUnits,
    EnableCustomerLogin,
    EnableCoupons,
    EnableCustomerDiscount,
    ShowOutOfStock,
    ShowProductImages,
}

impl SettingFlag {
    pub const ALL: [SettingFlag; 9] = [
        SettingFlag::EnableStock,
        SettingFlag::EnableVendor,
        SettingFlag::EnablePurchaseRate,
        SettingFlag::EnableMultipleUnits,
        SettingFlag::EnableCustomerLogin,
        SettingFlag::EnableCoupons,
        SettingFlag::EnableCustomerDiscount,
        SettingFlag::ShowOutOfStock,
        SettingFlag::ShowProductImages,
    ];

    /// Dotted key the store persists this flag under.
    pub fn path(&self) -> &'static str {
        match self {
            SettingFlag::EnableStock => "product_features.enable_stock",
            SettingFlag::EnableVendor => "product_features.enable_vendor",
            SettingFlag::EnablePurchaseRate => "product_features.enable_purchase_rate",
            SettingFlag::EnableMultipleUnits => "product_features.enable_multiple_units",
            SettingFlag::EnableCustomerLogin => "customer_features.enable_customer_login",
            SettingFlag::EnableCoupons => "customer_features.enable_coupons",
            SettingFlag::EnableCustomerDiscount => "customer_features.enable_customer_discount",
            SettingFlag::ShowOutOfStock => "ui.show_out_of_stock",
            SettingFlag::ShowProductImages => "ui.show_product_images",
        }
    }

    /// Short human label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            SettingFlag::EnableStock => "Stock tracking",
            SettingFlag::EnableVendor => "Vendors",
            SettingFlag::EnablePurchaseRate => "Purchase rate",
            SettingFlag::EnableMultipleUnits => "Multiple units",
            SettingFlag::EnableCustomerLogin => "Customer login",
            SettingFlag::EnableCoupons => "Coupons",
            SettingFlag::EnableCustomerDiscount => "Customer discount",
            SettingFlag::ShowOutOfStock => "Show out-of-stock products",
            SettingFlag::ShowProductImages => "Show product images",
        }
    }
}

impl std::fmt::Display for SettingFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl std::str::FromStr for SettingFlag {
    type Err = CoreError;

    /// Accepts the dotted key or just the flag name after the dot.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        SettingFlag::ALL
            .into_iter()
            .find(|flag| {
                let path = flag.path();
                path == key || path.rsplit('.').next() == Some(key)
            })
            .ok_or_else(|| CoreError::UnknownSetting(key.to_string()))
    }
}

impl AdminSettings {
    pub fn get(&self, flag: SettingFlag) -> bool {
        match flag {
            SettingFlag::EnableStock => self.product_features.enable_stock,
            SettingFlag::EnableVendor => self.product_features.enable_vendor,
            SettingFlag::EnablePurchaseRate => self.product_features.enable_purchase_rate,
            SettingFlag::EnableMultipleUnits => self.product_features.enable_multiple_units,
            SettingFlag::EnableCustomerLogin => self.customer_features.enable_customer_login,
            SettingFlag::EnableCoupons => self.customer_features.enable_coupons,
            SettingFlag::EnableCustomerDiscount => self.customer_features.enable_customer_discount,
            SettingFlag::ShowOutOfStock => self.ui.show_out_of_stock,
            SettingFlag::ShowProductImages => self.ui.show_product_images,
        }
    }

    pub fn set(&mut self, flag: SettingFlag, value: bool) {
        let slot = match flag {
            SettingFlag::EnableStock => &mut self.product_features.enable_stock,
            SettingFlag::EnableVendor => &mut self.product_features.enable_vendor,
            SettingFlag::EnablePurchaseRate => &mut self.product_features.enable_purchase_rate,
            SettingFlag::EnableMultipleUnits => &mut self.product_features.enable_multiple_units,
            SettingFlag::EnableCustomerLogin => &mut self.customer_features.enable_customer_login,
            SettingFlag::EnableCoupons => &mut self.customer_features.enable_coupons,
            SettingFlag::EnableCustomerDiscount => {
                &mut self.customer_features.enable_customer_discount
            }
            SettingFlag::ShowOutOfStock => &mut self.ui.show_out_of_stock,
            SettingFlag::ShowProductImages => &mut self.ui.show_product_images,
        };
        *slot = value;
    }

    /// Every flag with its current value, in display order.
    pub fn flags(&self) -> impl Iterator<Item = (SettingFlag, bool)> + '_ {
        SettingFlag::ALL.into_iter().map(move |flag| (flag, self.get(flag)))
    }
}

/// Body of `POST /api/settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingUpdate {
    pub key: String,
    pub value: bool,
}

impl SettingUpdate {
    pub fn new(flag: SettingFlag, value: bool) -> Self {
        SettingUpdate {
            key: flag.path().to_string(),
            value,
        }
    }

    /// Parses a key and builds the update.
    pub fn parse(key: &str, value: bool) -> CoreResult<Self> {
        Ok(SettingUpdate::new(key.parse()?, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_default_off() {
        let settings: AdminSettings =
            serde_json::from_str(r#"{"product_features": {"enable_stock": true}}"#).unwrap();

        assert!(settings.get(SettingFlag::EnableStock));
        assert!(!settings.get(SettingFlag::EnableVendor));
        assert!(!settings.get(SettingFlag::ShowProductImages));
    }

    #[test]
    fn test_get_set_every_flag() {
        let mut settings = AdminSettings::default();
        for flag in SettingFlag::ALL {
            settings.set(flag, true);
            assert!(settings.get(flag), "{flag} should be on");
        }
        assert!(settings.flags().all(|(_, on)| on));
    }

    #[test]
    fn test_paths_match_wire_layout() {
        let mut settings = AdminSettings::default();
        settings.set(SettingFlag::ShowOutOfStock, true);
        let json = serde_json::to_value(settings).unwrap();

        for flag in SettingFlag::ALL {
            let (section, name) = flag.path().split_once('.').unwrap();
            assert!(json[section][name].is_boolean(), "{} missing", flag.path());
        }
        assert_eq!(json["ui"]["show_out_of_stock"], true);
    }

    #[test]
    fn test_parse_flag_names() {
        assert_eq!(
            "ui.show_product_images".parse::<SettingFlag>().unwrap(),
            SettingFlag::ShowProductImages
        );
        assert_eq!(
            "enable_coupons".parse::<SettingFlag>().unwrap(),
            SettingFlag::EnableCoupons
        );
        assert!(matches!(
            "ui.dark_mode".parse::<SettingFlag>(),
            Err(CoreError::UnknownSetting(_))
        ));
    }

    #[test]
    fn test_setting_update_body() {
        let update = SettingUpdate::parse("enable_stock", false).unwrap();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"key": "product_features.enable_stock", "value": false})
        );
    }
}

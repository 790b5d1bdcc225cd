//! # Dashboard KPIs
//!
//! Pure aggregation over already-fetched products and orders.
//!
//! ## Buckets
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Products                          Orders                               │
//! │  ────────                          ──────                               │
//! │  stock == 0      → out_of_stock    created today      → today_*        │
//! │  stock  > 0      → in_stock        created this month → month_*        │
//! │  0 < stock < 5   → low_stock       unparsable date    → neither bucket │
//! │  Σ stock         → total qty                            (still counted │
//! │  Σ stock × price → total value                           in total)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Today" is passed in so the aggregation stays deterministic;
//! [`DashboardKpis::compute_now`] reads the local clock.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Order, Product};

/// Stock figures over the product list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockStats {
    pub total_products: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
    pub low_stock: usize,
    pub total_stock_quantity: f64,
    #[ts(as = "f64")]
    pub total_stock_value: Money,
}

/// Order counts and revenue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderStats {
    pub total_orders: usize,
    pub today_orders: usize,
    #[ts(as = "f64")]
    pub today_revenue: Money,
    pub month_orders: usize,
    #[ts(as = "f64")]
    pub month_revenue: Money,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardKpis {
    pub stock: StockStats,
    pub orders: OrderStats,
}

impl StockStats {
    pub fn compute(products: &[Product]) -> Self {
        let mut stats = StockStats {
            total_products: products.len(),
            ..StockStats::default()
        };

        for product in products {
            stats.total_stock_quantity += product.stock;
            stats.total_stock_value += product.stock_value();

            if product.is_out_of_stock() {
                stats.out_of_stock += 1;
            } else if product.is_in_stock() {
                stats.in_stock += 1;
                if product.is_low_stock() {
                    stats.low_stock += 1;
                }
            }
        }

        stats
    }
}

impl OrderStats {
    pub fn compute(orders: &[Order], today: NaiveDate) -> Self {
        let mut stats = OrderStats {
            total_orders: orders.len(),
            ..OrderStats::default()
        };

        for order in orders {
            let Some(day) = order.created_on() else {
                continue;
            };

            if day.year() == today.year() && day.month() == today.month() {
                stats.month_orders += 1;
                stats.month_revenue += order.total;

                if day.day() == today.day() {
                    stats.today_orders += 1;
                    stats.today_revenue += order.total;
                }
            }
        }

        stats
    }
}

impl DashboardKpis {
    pub fn compute(products: &[Product], orders: &[Order], today: NaiveDate) -> Self {
        DashboardKpis {
            stock: StockStats::compute(products),
            orders: OrderStats::compute(orders, today),
        }
    }

    /// Same as [`DashboardKpis::compute`], bucketing by the local clock.
    pub fn compute_now(products: &[Product], orders: &[Order]) -> Self {
        Self::compute(products, orders, Local::now().date_naive())
    }
}

/// The first `n` orders in the order the store returned them.
pub fn recent_orders(orders: &[Order], n: usize) -> &[Order] {
    &orders[..orders.len().min(n)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: f64, price: f64) -> Product {
        Product {
            stock,
            price: Money::from_major(price),
            ..Product::default()
        }
    }

    fn order(total: f64, created_at: Option<&str>) -> Order {
        Order {
            total: Money::from_major(total),
            created_at: created_at.map(str::to_string),
            ..Order::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_stock_buckets() {
        let products = [product(0.0, 10.0), product(3.0, 10.0), product(10.0, 10.0)];
        let stats = StockStats::compute(&products);

        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.out_of_stock, 1);
        assert_eq!(stats.in_stock, 2);
        assert_eq!(stats.low_stock, 1);
        assert_eq!(stats.total_stock_quantity, 13.0);
    }

    #[test]
    fn test_stock_value() {
        let products = [product(2.0, 45.5), product(0.5, 80.0)];
        let stats = StockStats::compute(&products);
        assert_eq!(stats.total_stock_value, Money::from_major(131.0));
    }

    #[test]
    fn test_stock_value_saturates_on_absurd_prices() {
        let products = [product(10.0, 1e17), product(10.0, 1e17)];
        let stats = StockStats::compute(&products);

        assert_eq!(stats.total_stock_value.paise(), i64::MAX);
        assert_eq!(stats.total_stock_quantity, 20.0);
    }

    #[test]
    fn test_order_buckets() {
        let orders = [
            order(100.0, Some("2026-10-18T08:15:00")),
            order(50.0, Some("2026-10-18 19:00:00")),
            order(70.0, Some("2026-10-02T10:00:00")),
            order(999.0, Some("2026-09-18T10:00:00")),
            order(999.0, Some("2025-10-18T10:00:00")),
        ];
        let stats = OrderStats::compute(&orders, today());

        assert_eq!(stats.total_orders, 5);
        assert_eq!(stats.today_orders, 2);
        assert_eq!(stats.today_revenue, Money::from_major(150.0));
        assert_eq!(stats.month_orders, 3);
        assert_eq!(stats.month_revenue, Money::from_major(220.0));
    }

    #[test]
    fn test_unparsable_dates_only_count_in_total() {
        let orders = [
            order(10.0, Some("yesterday-ish")),
            order(20.0, None),
            order(30.0, Some("2026-10-18")),
        ];
        let stats = OrderStats::compute(&orders, today());

        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.today_orders, 1);
        assert_eq!(stats.month_orders, 1);
        assert_eq!(stats.month_revenue, Money::from_major(30.0));
    }

    #[test]
    fn test_empty_inputs() {
        let kpis = DashboardKpis::compute(&[], &[], today());
        assert_eq!(kpis, DashboardKpis::default());
    }

    #[test]
    fn test_recent_orders() {
        let orders: Vec<Order> = (0..7).map(|i| order(i as f64, None)).collect();
        assert_eq!(recent_orders(&orders, 5).len(), 5);
        assert_eq!(recent_orders(&orders[..2], 5).len(), 2);
    }
}

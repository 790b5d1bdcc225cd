use anyhow::Result;
use chrono::Local;
use tracing::debug;

use catalog_client::CatalogClient;
use catalog_core::dashboard::{recent_orders, DashboardKpis};
use catalog_core::RECENT_ORDERS;

use super::print_json;

pub async fn run(client: &CatalogClient, json: bool) -> Result<()> {
    let (products, orders) = tokio::try_join!(client.list_products(), client.list_orders())?;
    let today = Local::now().date_naive();
    debug!(products = products.len(), orders = orders.len(), %today, "Computing dashboard");

    let kpis = DashboardKpis::compute(&products, &orders, today);
    let recent = recent_orders(&orders, RECENT_ORDERS);

    if json {
        return print_json(&serde_json::json!({
            "kpis": kpis,
            "recent_orders": recent,
        }));
    }

    let stock = &kpis.stock;
    println!("Dashboard for {}", today);
    println!();
    println!("Products         {:>10}", stock.total_products);
    println!("  in stock       {:>10}", stock.in_stock);
    println!("  out of stock   {:>10}", stock.out_of_stock);
    println!("  low stock      {:>10}", stock.low_stock);
    println!("Stock quantity   {:>10}", stock.total_stock_quantity);
    println!("Stock value      {:>10}", stock.total_stock_value.to_string());
    println!();

    let sales = &kpis.orders;
    println!("Orders           {:>10}", sales.total_orders);
    println!(
        "  today          {:>10}   {}",
        sales.today_orders, sales.today_revenue
    );
    println!(
        "  this month     {:>10}   {}",
        sales.month_orders, sales.month_revenue
    );

    if !recent.is_empty() {
        println!();
        println!("Recent orders");
        for order in recent {
            println!(
                "  {:<24} {:>12}  {}",
                order.customer_name.as_deref().unwrap_or(&order.customer_id),
                order.total.to_string(),
                order.status
            );
        }
    }

    Ok(())
}

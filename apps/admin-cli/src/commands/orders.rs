use anyhow::{anyhow, Result};
use tracing::{info, warn};

use catalog_client::CatalogClient;
use catalog_core::orders::{item_report, order_slip, party_report, OrderFilter};
use catalog_core::OrderStatus;

use super::print_json;
use crate::cli::{OrdersCommand, ReportKind};

pub async fn run(client: &CatalogClient, action: OrdersCommand, json: bool) -> Result<()> {
    match action {
        OrdersCommand::List { search, status } => {
            let filter = OrderFilter {
                search: search.unwrap_or_default(),
                status: status.as_deref().map(str::parse::<OrderStatus>).transpose()?,
            };
            let orders = client.list_orders().await?;
            let hits = filter.apply(&orders);

            if json {
                return print_json(&hits);
            }

            for order in &hits {
                println!(
                    "{:<12} {:<24} {:>3} items {:>12}  {:<9} {}",
                    order.id,
                    order.customer_name.as_deref().unwrap_or(&order.customer_id),
                    order.items.len(),
                    order.total.to_string(),
                    order.status.as_str(),
                    order.created_at.as_deref().unwrap_or("")
                );
            }
            println!("{} of {} orders", hits.len(), orders.len());
            Ok(())
        }

        OrdersCommand::Report { by } => {
            let orders = client.list_orders().await?;
            match by {
                ReportKind::Party => {
                    let report = party_report(&orders);
                    if json {
                        return print_json(&report);
                    }
                    for entry in &report {
                        println!("{}", entry.customer);
                        for item in &entry.items {
                            println!(
                                "  {:<32} {} {}",
                                item.product_name.as_deref().unwrap_or(&item.product_id),
                                item.qty,
                                item.unit_name
                            );
                        }
                    }
                }
                ReportKind::Item => {
                    let report = item_report(&orders);
                    if json {
                        return print_json(&report);
                    }
                    for entry in &report {
                        let totals: Vec<String> = entry
                            .totals_by_unit()
                            .into_iter()
                            .map(|(unit, qty)| format!("{} {}", qty, unit))
                            .collect();
                        println!("{}  ({})", entry.product, totals.join(", "));
                        for line in &entry.lines {
                            println!("  {:<24} {} {}", line.customer, line.qty, line.unit);
                        }
                    }
                }
            }
            Ok(())
        }

        OrdersCommand::Status { status, ids } => {
            let status: OrderStatus = status.parse()?;
            // One request per order; stop at the first failure.
            for id in &ids {
                client.update_order_status(id, status).await?;
                info!(order = %id, %status, "Order status updated");
            }
            println!("{} order(s) marked {}", ids.len(), status);
            Ok(())
        }

        OrdersCommand::Slip { id } => {
            let orders = client.list_orders().await?;
            let order = orders
                .iter()
                .find(|o| o.id == id)
                .ok_or_else(|| anyhow!("order {} not found", id))?;
            if order.items_total() != order.total {
                warn!(order = %id, "Order total differs from the sum of its lines");
            }
            println!("{}", order_slip(order));
            Ok(())
        }

        OrdersCommand::Delete { ids } => {
            for id in &ids {
                client.delete_order(id).await?;
                info!(order = %id, "Order deleted");
            }
            println!("Deleted {} order(s)", ids.len());
            Ok(())
        }
    }
}

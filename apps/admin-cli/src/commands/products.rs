use anyhow::{anyhow, Result};
use tracing::info;

use catalog_client::CatalogClient;
use catalog_core::bulk_edit::ProductPatch;
use catalog_core::catalog::{category_name, ImageFilter, ProductFilter, StockFilter};
use catalog_core::numeric::parse_quantity;
use catalog_core::validation::{validate_search_query, validate_stock};

use super::print_json;
use crate::cli::{ImagesArg, ProductsCommand, StockArg};

pub async fn run(client: &CatalogClient, action: ProductsCommand, json: bool) -> Result<()> {
    match action {
        ProductsCommand::List {
            search,
            category,
            stock,
            images,
        } => {
            let filter = ProductFilter {
                search: validate_search_query(search.as_deref().unwrap_or_default())?,
                category_id: category,
                images: match images {
                    None => ImageFilter::Any,
                    Some(ImagesArg::With) => ImageFilter::With,
                    Some(ImagesArg::Without) => ImageFilter::Without,
                },
                stock: match stock {
                    None => StockFilter::Any,
                    Some(StockArg::In) => StockFilter::InStock,
                    Some(StockArg::Out) => StockFilter::OutOfStock,
                },
            };
            list(client, &filter, json).await
        }
        ProductsCommand::SetStock { id, stock } => {
            let stock =
                parse_quantity(&stock).ok_or_else(|| anyhow!("'{}' is not a number", stock))?;
            validate_stock(stock)?;

            client.patch_product(&id, &ProductPatch::stock(stock)).await?;
            info!(product = %id, stock, "Stock updated");
            println!("Stock of {} set to {}", id, stock);
            Ok(())
        }
        ProductsCommand::Delete { id } => {
            client.delete_product(&id).await?;
            info!(product = %id, "Product deleted");
            println!("Deleted {}", id);
            Ok(())
        }
    }
}

async fn list(client: &CatalogClient, filter: &ProductFilter, json: bool) -> Result<()> {
    let (products, categories) =
        tokio::try_join!(client.list_products(), client.list_categories())?;
    let hits = filter.apply(&products);

    if json {
        return print_json(&hits);
    }

    for product in &hits {
        let unit = product.primary_unit().map(|u| u.name.as_str()).unwrap_or("");
        println!(
            "{:<12} {:<32} {:<16} {:>10} {:>8} {:<6} {}",
            product.id,
            product.name,
            category_name(&categories, product.category_id.as_deref()),
            product.price.to_string(),
            product.stock,
            unit,
            if product.is_in_stock() { "in stock" } else { "out" }
        );
    }
    println!("{} of {} products", hits.len(), products.len());
    Ok(())
}

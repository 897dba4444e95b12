use anyhow::{Context, Result};
use catalog_service::client::ApiClient;
use colored::Colorize;

use crate::utils::{self, format};

pub async fn execute(client: &ApiClient, id: i64) -> Result<()> {
    let product = match client.product(id).await {
        Ok(product) => product,
        Err(e) if e.is_not_found() => anyhow::bail!("Product {} not found", id),
        Err(e) => return Err(e).context(format!("Failed to load product {}", id)),
    };

    utils::section(&product.name);
    println!("  {} {}", "Id:".bold(), product.id);
    println!("  {} {}", "Price:".bold(), format::format_price(&product.price));
    println!("  {} {}", "Status:".bold(), format::status_label(product.status));
    if let Some(category) = &product.category {
        println!("  {} {} (#{})", "Category:".bold(), category.name, category.id);
    }
    if !product.description.is_empty() {
        println!();
        println!("  {}", product.description);
    }

    Ok(())
}

use anyhow::{Context, Result};
use catalog_service::client::ApiClient;

use crate::utils;

pub async fn execute(client: &ApiClient) -> Result<()> {
    let categories = client
        .categories()
        .await
        .context("Failed to load categories")?;

    utils::section("Categories");

    if categories.is_empty() {
        utils::warning("No categories found");
        return Ok(());
    }

    for category in &categories {
        println!("  #{:<5} {}", category.id, category.name);
    }

    println!();
    utils::info(&format!("{} category(ies)", categories.len()));

    Ok(())
}

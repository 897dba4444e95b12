use anyhow::{Context, Result};
use catalog_service::client::{ApiClient, SinglePage};
use catalog_service::models::Product;

use crate::utils::{self, format};

pub async fn execute(client: &ApiClient, id: i64, page: u32) -> Result<()> {
    let page = client
        .category_products(id, page)
        .await
        .with_context(|| format!("Failed to load products of category {}", id))?;

    utils::section(&format!("Category {}", id));

    if page.items.is_empty() {
        utils::warning("No products on this page");
    }
    for product in &page.items {
        println!("  {}", format::product_line(product));
    }

    println!();
    utils::info(&navigation(&page));

    Ok(())
}

fn navigation(page: &SinglePage<Product>) -> String {
    let next = match page.has_next() {
        Some(has_next) => format::yes_no(has_next),
        None => "unknown",
    };
    format!(
        "Page {} | {} item(s) in total | previous: {} | next: {}",
        page.page_number,
        page.total_items,
        format::yes_no(page.has_previous()),
        next
    )
}

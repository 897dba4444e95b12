//! Catalog endpoints

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};

use super::query::{category_reference, PageQuery, ProductsQuery};
use super::response::LdJson;
use crate::envelope::{encode, PAGE_PLACEHOLDER};
use crate::error::{Error, Result};
use crate::pagination::paginate;
use crate::repository::ProductFilter;
use crate::state::AppState;

/// `GET /api/categories/{id}/products?page=N`
///
/// An unknown category is an empty collection, not a 404.
pub async fn category_products(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page_number = query.page_number();
    let products = state.repository().products_by_category(category_id).await?;
    let page = paginate(products, page_number, state.page_size());

    tracing::debug!(
        category_id,
        page = page.page_number,
        total = page.total_items,
        returned = page.items.len(),
        "Category products page"
    );

    let template = format!(
        "/api/categories/{}/products?page={}",
        category_id, PAGE_PLACEHOLDER
    );
    Ok(LdJson(encode(page, &template)))
}

/// `GET /api/products?category=&status=&page=`
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<impl IntoResponse> {
    let filter = query.filter()?;
    let products = state.repository().find_products(&filter).await?;
    let page = paginate(products, query.page_number(), state.page_size());

    tracing::debug!(
        category_id = ?filter.category_id,
        status = ?filter.status,
        page = page.page_number,
        total = page.total_items,
        "Products page"
    );

    Ok(LdJson(encode(page, &products_template(&filter))))
}

/// Link template that keeps the active filters
fn products_template(filter: &ProductFilter) -> String {
    let mut template = String::from("/api/products?");
    if let Some(id) = filter.category_id {
        template.push_str(&format!("category={}&", category_reference(id)));
    }
    if let Some(status) = filter.status {
        template.push_str(&format!("status={}&", status));
    }
    template.push_str("page=");
    template.push_str(PAGE_PLACEHOLDER);
    template
}

/// `GET /api/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let product = state
        .repository()
        .find_product(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Product {} not found", id)))?;

    Ok(LdJson(product))
}

/// `GET /api/categories?page=N`
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let categories = state.repository().categories().await?;
    let page = paginate(categories, query.page_number(), state.page_size());

    let template = format!("/api/categories?page={}", PAGE_PLACEHOLDER);
    Ok(LdJson(encode(page, &template)))
}

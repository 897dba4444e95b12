//! HTTP handlers and routing
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /api/categories` | [`list_categories`] |
//! | `GET /api/categories/{id}/products` | [`category_products`] |
//! | `GET /api/products` | [`list_products`] |
//! | `GET /api/products/{id}` | [`get_product`] |
//! | `GET /health` | [`crate::health::health`] |
//! | `GET /ready` | [`crate::health::readiness`] |

mod catalog;
mod query;
mod response;

use axum::{routing::get, Router};

use crate::health::{health, readiness};
use crate::state::AppState;

pub use catalog::{category_products, get_product, list_categories, list_products};
pub use query::{
    category_reference, parse_category_reference, parse_page, PageQuery, ProductsQuery,
    CATEGORY_REFERENCE_PREFIX,
};
pub use response::{LdJson, LD_JSON};

/// Routes under `/api` only
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{id}/products", get(category_products))
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
}

/// Full application router, without middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(health))
        .route("/ready", get(readiness))
        .with_state(state)
}

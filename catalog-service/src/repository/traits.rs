//! Repository trait definitions
//!
//! The catalog storage is consumed through [`CatalogRepository`], a read-only,
//! object-safe trait so that handlers can hold it as `Arc<dyn CatalogRepository>`
//! regardless of the backend chosen at startup.

use async_trait::async_trait;

use super::error::RepositoryError;
use super::filter::ProductFilter;
use crate::models::{Category, Product};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Read-only access to catalog records
///
/// Every listing operation returns its records in a stable order: products by
/// descending id, categories by ascending id. Pagination is applied by the caller.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All products belonging to a category, newest (highest id) first
    ///
    /// An unknown category yields an empty list, not an error.
    async fn products_by_category(&self, category_id: i64) -> RepositoryResult<Vec<Product>>;

    /// Find a product by its identifier
    ///
    /// Returns `Ok(None)` if the product does not exist.
    async fn find_product(&self, id: i64) -> RepositoryResult<Option<Product>>;

    /// All products matching the filter, highest id first
    async fn find_products(&self, filter: &ProductFilter) -> RepositoryResult<Vec<Product>>;

    /// All categories, lowest id first
    async fn categories(&self) -> RepositoryResult<Vec<Category>>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> RepositoryResult<()>;

    /// Short backend label used in logs and readiness output
    fn backend(&self) -> &'static str;
}

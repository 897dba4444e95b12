//! In-memory catalog repository
//!
//! Used when no database is configured, and by tests. Records can be supplied
//! directly or loaded from a JSON fixture file of the form
//! `{ "categories": [...], "products": [...] }`.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use super::error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
use super::filter::ProductFilter;
use super::traits::{CatalogRepository, RepositoryResult};
use crate::models::{Category, Product};

/// Catalog contents as stored in a fixture file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFixtures {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Immutable in-memory catalog
///
/// Records are sorted once at construction so every read is a filtered clone.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogRepository {
    categories: Arc<Vec<Category>>,
    products: Arc<Vec<Product>>,
}

impl InMemoryCatalogRepository {
    /// Build a repository from explicit records
    pub fn new(mut categories: Vec<Category>, mut products: Vec<Product>) -> Self {
        categories.sort_by_key(|c| c.id);
        products.sort_by(|a, b| b.id.cmp(&a.id));
        Self {
            categories: Arc::new(categories),
            products: Arc::new(products),
        }
    }

    /// Build a repository from parsed fixtures
    pub fn from_fixtures(fixtures: CatalogFixtures) -> Self {
        Self::new(fixtures.categories, fixtures.products)
    }

    /// Load fixtures from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            RepositoryError::new(
                RepositoryOperation::LoadFixtures,
                RepositoryErrorKind::Other,
                format!("Failed to read fixtures '{}': {}", path.display(), e),
            )
        })?;

        let fixtures: CatalogFixtures = serde_json::from_str(&raw).map_err(|e| {
            RepositoryError::serialization_error(
                RepositoryOperation::LoadFixtures,
                format!("Invalid fixtures '{}': {}", path.display(), e),
            )
        })?;

        tracing::info!(
            path = %path.display(),
            categories = fixtures.categories.len(),
            products = fixtures.products.len(),
            "Loaded catalog fixtures"
        );

        Ok(Self::from_fixtures(fixtures))
    }

    /// Number of products held
    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn products_by_category(&self, category_id: i64) -> RepositoryResult<Vec<Product>> {
        self.find_products(&ProductFilter::default().with_category(category_id))
            .await
    }

    async fn find_product(&self, id: i64) -> RepositoryResult<Option<Product>> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_products(&self, filter: &ProductFilter) -> RepositoryResult<Vec<Product>> {
        Ok(self
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn categories(&self) -> RepositoryResult<Vec<Category>> {
        Ok(self.categories.as_ref().clone())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

//! Filtering criteria for product listing queries
//!
//! # Example
//!
//! ```rust
//! use catalog_service::models::ProductStatus;
//! use catalog_service::repository::ProductFilter;
//!
//! let filter = ProductFilter::default()
//!     .with_category(2)
//!     .with_status(ProductStatus::Online);
//!
//! assert_eq!(filter.category_id, Some(2));
//! assert!(!filter.is_empty());
//! ```

use crate::models::{Product, ProductStatus};

/// Exact-match filters for the product collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Only products of this category
    pub category_id: Option<i64>,
    /// Only products with this status
    pub status: Option<ProductStatus>,
}

impl ProductFilter {
    /// Restrict to a category
    #[must_use]
    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Restrict to a status
    #[must_use]
    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none() && self.status.is_none()
    }

    /// Evaluate the filter against an in-memory product
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = match self.category_id {
            Some(id) => product.category.as_ref().is_some_and(|c| c.id == id),
            None => true,
        };
        let status_ok = self.status.map_or(true, |status| product.status == status);
        category_ok && status_ok
    }
}

//! Catalog storage access
//!
//! Handlers talk to storage only through [`CatalogRepository`]. Two backends are
//! provided:
//!
//! - [`InMemoryCatalogRepository`]: records held in memory, optionally loaded from a
//!   JSON fixture file
//! - `PgCatalogRepository`: PostgreSQL via sqlx (requires the `database` feature)
//!
//! # Example
//!
//! ```rust
//! use catalog_service::models::{Category, Product, ProductStatus};
//! use catalog_service::repository::{CatalogRepository, InMemoryCatalogRepository};
//!
//! # tokio_test_block(async {
//! let repo = InMemoryCatalogRepository::new(
//!     vec![Category { id: 1, name: "Books".into() }],
//!     vec![],
//! );
//! assert!(repo.products_by_category(1).await.unwrap().is_empty());
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

mod error;
mod filter;
mod memory;
mod traits;

#[cfg(feature = "database")]
mod postgres;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use filter::ProductFilter;
pub use memory::{CatalogFixtures, InMemoryCatalogRepository};
pub use traits::{CatalogRepository, RepositoryResult};

#[cfg(feature = "database")]
pub use postgres::PgCatalogRepository;

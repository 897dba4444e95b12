//! PostgreSQL catalog repository
//!
//! Expects the following tables:
//!
//! ```sql
//! CREATE TABLE category (
//!     id   BIGSERIAL PRIMARY KEY,
//!     name VARCHAR(255) NOT NULL
//! );
//!
//! CREATE TABLE product (
//!     id          BIGSERIAL PRIMARY KEY,
//!     name        VARCHAR(255) NOT NULL,
//!     description TEXT NOT NULL DEFAULT '',
//!     price       NUMERIC(10, 2) NOT NULL,
//!     status      VARCHAR(16) NOT NULL DEFAULT 'online',
//!     category_id BIGINT REFERENCES category(id)
//! );
//! ```
//!
//! Prices are read back as `price::text` so the two-fraction-digit decimal string
//! survives without a float conversion.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use super::error::{RepositoryError, RepositoryOperation};
use super::filter::ProductFilter;
use super::traits::{CatalogRepository, RepositoryResult};
use crate::models::{Category, Product, ProductStatus};

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.price::text AS price, p.status, \
     c.id AS category_id, c.name AS category_name";

/// Catalog repository backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn product_from_row(row: &PgRow, op: RepositoryOperation) -> RepositoryResult<Product> {
    let decode = |e: sqlx::Error| RepositoryError::from(e).with_operation(op);

    let status: String = row.try_get("status").map_err(decode)?;
    let status = status
        .parse::<ProductStatus>()
        .map_err(|e| RepositoryError::serialization_error(op, e))?;

    let category_id: Option<i64> = row.try_get("category_id").map_err(decode)?;
    let category_name: Option<String> = row.try_get("category_name").map_err(decode)?;
    let category = category_id.map(|id| Category {
        id,
        name: category_name.unwrap_or_default(),
    });

    Ok(Product {
        id: row.try_get("id").map_err(decode)?,
        name: row.try_get("name").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        price: row.try_get("price").map_err(decode)?,
        status,
        category,
    })
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn products_by_category(&self, category_id: i64) -> RepositoryResult<Vec<Product>> {
        self.find_products(&ProductFilter::default().with_category(category_id))
            .await
            .map_err(|e| e.with_operation(RepositoryOperation::ProductsByCategory))
    }

    async fn find_product(&self, id: i64) -> RepositoryResult<Option<Product>> {
        let op = RepositoryOperation::FindProduct;
        let sql = format!(
            "SELECT {} FROM product p LEFT JOIN category c ON c.id = p.category_id WHERE p.id = $1",
            PRODUCT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(op))?;

        row.map(|row| product_from_row(&row, op)).transpose()
    }

    async fn find_products(&self, filter: &ProductFilter) -> RepositoryResult<Vec<Product>> {
        let op = RepositoryOperation::FindProducts;
        // NULL parameters disable the corresponding predicate
        let sql = format!(
            "SELECT {} FROM product p LEFT JOIN category c ON c.id = p.category_id \
             WHERE ($1::BIGINT IS NULL OR p.category_id = $1) \
             AND ($2::TEXT IS NULL OR p.status = $2) \
             ORDER BY p.id DESC",
            PRODUCT_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(filter.category_id)
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(op))?;

        rows.iter().map(|row| product_from_row(row, op)).collect()
    }

    async fn categories(&self) -> RepositoryResult<Vec<Category>> {
        let op = RepositoryOperation::Categories;
        let rows = sqlx::query("SELECT id, name FROM category ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(op))?;

        rows.iter()
            .map(|row| {
                Ok(Category {
                    id: row
                        .try_get("id")
                        .map_err(|e| RepositoryError::from(e).with_operation(op))?,
                    name: row
                        .try_get("name")
                        .map_err(|e| RepositoryError::from(e).with_operation(op))?,
                })
            })
            .collect()
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Ping))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

//! # catalog-service
//!
//! Product catalog API serving paginated JSON-LD collections, plus a client that
//! reassembles those collections page by page.
//!
//! ## Features
//!
//! - **Collections**: fixed-size pagination with hydra `PartialCollectionView` links
//! - **Dual-shape decoding**: `member`/`totalItems` and `hydra:member`/`hydra:totalItems`
//! - **Client aggregation**: bounded, sequential page walks with a hard page cap
//! - **Browsing**: client-side search, locale-style sorting and 12-per-page views
//! - **Middleware stack**: request tracking, panic recovery, body limits, CORS, compression
//! - **Storage**: in-memory fixtures by default, PostgreSQL behind the `database` feature
//! - **Graceful shutdown**: SIGTERM and SIGINT
//!
//! ## Example
//!
//! ```rust,no_run
//! use catalog_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::builder()
//!         .config(config.clone())
//!         .build()
//!         .await?;
//!
//!     Server::new(config).serve(router(state)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod browse;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod pagination;
pub mod repository;
pub mod server;
pub mod state;
pub mod view;

#[cfg(feature = "database")]
pub mod database;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::browse::{apply, Record, SearchFilter, SortKey, SortOrder, SortSpec};
    pub use crate::client::{fetch_all, fetch_one, ApiClient, ClientError, PageFetcher, ProductQuery};
    pub use crate::config::{CatalogConfig, ClientConfig, Config, RequestTrackingConfig};
    pub use crate::envelope::{decode, encode, Collection, HydraCollection};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::handlers::{router, LdJson};
    pub use crate::health::{health, readiness};
    pub use crate::ids::{MakeTypedRequestId, RequestId, RequestIdError};
    pub use crate::models::{Category, Product, ProductStatus};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{paginate, Page, DEFAULT_PAGE_SIZE};
    pub use crate::repository::{
        CatalogRepository, InMemoryCatalogRepository, ProductFilter, RepositoryError,
        RepositoryErrorKind, RepositoryOperation, RepositoryResult,
    };
    pub use crate::server::Server;
    pub use crate::state::{AppState, AppStateBuilder};
    pub use crate::view::{CatalogView, LoadState, ITEMS_PER_PAGE};

    #[cfg(feature = "database")]
    pub use crate::repository::PgCatalogRepository;

    pub use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Json, Response},
        routing::get,
        Router,
    };

    pub use serde::{Deserialize, Serialize};

    pub use tracing::{debug, error, info, warn};

    pub use tokio;

    pub use async_trait::async_trait;

    pub use anyhow::{self, Context as AnyhowContext};
    pub use thiserror::Error;
}

//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness probe, always 200 while the process runs
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness probe
///
/// Pings the catalog repository; 503 when it is unreachable.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let repository = state.repository();

    let catalog = match repository.ping().await {
        Ok(()) => DependencyStatus {
            healthy: true,
            message: Some(format!("{} backend reachable", repository.backend())),
        },
        Err(e) => {
            tracing::error!(backend = repository.backend(), "Catalog health check failed: {}", e);
            DependencyStatus {
                healthy: false,
                message: Some(e.message),
            }
        }
    };

    let ready = catalog.healthy;
    let mut dependencies = HashMap::new();
    dependencies.insert("catalog".to_string(), catalog);

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ready,
            service: state.config().service.name.clone(),
            dependencies,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{Category, Product};
    use crate::repository::{
        CatalogRepository, InMemoryCatalogRepository, ProductFilter, RepositoryError,
        RepositoryResult,
    };
    use async_trait::async_trait;
    use axum::response::IntoResponse;
    use std::sync::Arc;

    struct Unreachable;

    #[async_trait]
    impl CatalogRepository for Unreachable {
        async fn products_by_category(&self, _: i64) -> RepositoryResult<Vec<Product>> {
            Err(RepositoryError::connection_failed("down"))
        }
        async fn find_product(&self, _: i64) -> RepositoryResult<Option<Product>> {
            Err(RepositoryError::connection_failed("down"))
        }
        async fn find_products(&self, _: &ProductFilter) -> RepositoryResult<Vec<Product>> {
            Err(RepositoryError::connection_failed("down"))
        }
        async fn categories(&self) -> RepositoryResult<Vec<Category>> {
            Err(RepositoryError::connection_failed("down"))
        }
        async fn ping(&self) -> RepositoryResult<()> {
            Err(RepositoryError::connection_failed("connection refused"))
        }
        fn backend(&self) -> &'static str {
            "unreachable"
        }
    }

    #[test]
    fn test_health_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            service: "catalog-service".to_string(),
            version: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "healthy");
        assert!(value.get("version").is_none());
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let state = AppState::new(
            Config::default(),
            Arc::new(InMemoryCatalogRepository::default()),
        );
        let response = health(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_ok_with_memory_backend() {
        let state = AppState::new(
            Config::default(),
            Arc::new(InMemoryCatalogRepository::default()),
        );
        let response = readiness(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_unavailable_when_repository_down() {
        let state = AppState::new(Config::default(), Arc::new(Unreachable));
        let response = readiness(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ReadinessResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.ready);
        assert_eq!(
            body.dependencies["catalog"].message.as_deref(),
            Some("connection refused")
        );
    }
}

//! Application state management

use std::sync::Arc;

use crate::{
    config::Config,
    error::Result,
    repository::{CatalogRepository, InMemoryCatalogRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    repository: Arc<dyn CatalogRepository>,
}

impl AppState {
    /// Create state from a configuration and an already built repository
    pub fn new(config: Config, repository: Arc<dyn CatalogRepository>) -> Self {
        Self {
            config: Arc::new(config),
            repository,
        }
    }

    /// Create a builder that picks the repository backend from configuration
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &dyn CatalogRepository {
        self.repository.as_ref()
    }

    /// Records per page on listing endpoints
    pub fn page_size(&self) -> u32 {
        self.config.catalog.page_size.max(1)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.config.service.name)
            .field("backend", &self.repository.backend())
            .finish()
    }
}

/// Builder for AppState
///
/// Backend selection, first match wins:
/// 1. an explicitly supplied repository
/// 2. PostgreSQL, when `[database]` is configured and the `database` feature is on
/// 3. the in-memory repository loaded from `catalog.fixtures_path`
/// 4. an empty in-memory repository
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    repository: Option<Arc<dyn CatalogRepository>>,
}

impl AppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this repository instead of building one from configuration
    pub fn repository(mut self, repository: Arc<dyn CatalogRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Build the AppState
    pub async fn build(self) -> Result<AppState> {
        let config = self.config.unwrap_or_default();

        let repository = match self.repository {
            Some(repository) => repository,
            None => build_repository(&config).await?,
        };

        tracing::info!(backend = repository.backend(), "Catalog repository ready");

        Ok(AppState::new(config, repository))
    }
}

async fn build_repository(config: &Config) -> Result<Arc<dyn CatalogRepository>> {
    #[cfg(feature = "database")]
    if let Some(db_config) = &config.database {
        match crate::database::create_pool(db_config).await {
            Ok(pool) => {
                return Ok(Arc::new(crate::repository::PgCatalogRepository::new(pool)));
            }
            Err(e) if db_config.optional => {
                tracing::warn!(
                    "Database unavailable, falling back to in-memory catalog: {}",
                    e
                );
            }
            Err(e) => return Err(e),
        }
    }

    #[cfg(not(feature = "database"))]
    if config.database.is_some() {
        tracing::warn!(
            "[database] is configured but the `database` feature is disabled; using in-memory catalog"
        );
    }

    match &config.catalog.fixtures_path {
        Some(path) => Ok(Arc::new(InMemoryCatalogRepository::load(path).await?)),
        None => {
            tracing::info!("No fixtures configured, serving an empty catalog");
            Ok(Arc::new(InMemoryCatalogRepository::default()))
        }
    }
}

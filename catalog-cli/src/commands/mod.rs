use anyhow::{Context, Result};
use catalog_service::client::ApiClient;
use catalog_service::config::{ClientConfig, Config};

pub mod categories;
pub mod category;
pub mod health;
pub mod product;
pub mod products;

/// Command-line values that take precedence over the configuration files
#[derive(Debug, Default)]
pub struct ClientOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_pages: Option<u32>,
}

impl ClientOverrides {
    fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        config
    }
}

/// Build the API client from the `[client]` config section plus overrides
pub fn client(overrides: &ClientOverrides) -> Result<ApiClient> {
    let config = Config::load().context("Failed to load configuration")?;
    let client_config = overrides.apply(config.client);
    ApiClient::new(&client_config).context("Failed to create API client")
}

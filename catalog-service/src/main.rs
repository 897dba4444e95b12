//! Catalog API server

use catalog_service::observability::shutdown_tracing;
use catalog_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let state = AppState::builder().config(config.clone()).build().await?;

    let result = Server::new(config).serve(router(state)).await;
    if let Err(e) = &result {
        tracing::error!("Server exited with error: {}", e);
    }

    shutdown_tracing();
    result
}

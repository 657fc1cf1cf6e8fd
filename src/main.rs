use anyhow::Context;
use product_service::api::{self, app_state::AppState};
use product_service::config::loader::ConfigLoader;
use product_service::observability::{
    ObservabilityState, create_observability_router, init_tracing,
};
use product_service::storage::StorageFactory;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("failed to load configuration")?;
    ConfigLoader::validate(&config).context("invalid configuration")?;

    let _log_guard = init_tracing(&config.logging, &config.app_name);
    info!(
        "Starting {} ({} environment)...",
        config.app_name, config.environment
    );

    let product_repository = StorageFactory::create(&config.storage).await?;
    info!("Product storage initialized");

    let app_state = AppState::new(product_repository);

    let observability_state = Arc::new(ObservabilityState::new(env!("CARGO_PKG_VERSION")));
    let router = create_observability_router(observability_state).merge(api::create_router(app_state));
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

// src/bin/api_server.rs

use anyhow::Context;
use portfolio_api::infra::config::StoreBackend;
use portfolio_api::infra::telemetry::init_tracing;
use portfolio_api::transport;
use portfolio_api::{AppConfig, DocumentStore, FileStore, MemoryDocumentStore, PgDocumentStore};
use portfolio_api::PortfolioService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);

    info!(
        bind_addr = %config.bind_addr,
        backend = ?config.store_backend,
        public_dir = %config.public_dir.display(),
        "Starting portfolio API"
    );

    // --- Store Initialization ---
    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Postgres => Arc::new(
            PgDocumentStore::connect(&config)
                .await
                .context("Failed to initialize Postgres document store")?,
        ),
        StoreBackend::Memory => {
            warn!("Using in-memory document store; data is lost on shutdown");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    // --- File Store Initialization ---
    let files = FileStore::open(config.images_dir())
        .await
        .with_context(|| format!("Failed to open image directory {}", config.images_dir().display()))?;

    let service = PortfolioService::new(store, files, config.max_upload_bytes);
    let app_state = transport::http::AppState {
        service: Arc::new(service),
        public_dir: config.public_dir.clone(),
    };

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("API server listening on http://{}", config.bind_addr);
    info!("Swagger UI available at http://{}/swagger-ui", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Graceful shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received (Ctrl+C)");
}

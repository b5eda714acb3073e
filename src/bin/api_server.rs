// src/bin/api_server.rs

use cafe_directory::infra::telemetry::init_tracing;
use cafe_directory::transport;
use cafe_directory::AppConfig;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // --- Configuration ---
    let config = AppConfig::from_env()?;
    info!(?config, "configuration loaded");

    // --- Service Initialization ---
    info!("initializing cafe service");
    let app_state = transport::http::AppState::from_config(&config).await?;
    let cafe_count = app_state.cafe_service.all().await?.len();
    info!(cafe_count, "cafe service initialized");

    // --- HTTP Server ---
    // CORS covers the JSON lookup endpoint used from other origins.
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state).layer(cors);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("listening on http://{}", listener.local_addr()?);
    info!("OpenAPI document at /api-docs/openapi.json");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("graceful shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use bitman_client::ReqwestTransport;
use bitman_core::Settings;
use bitman_server::routes;
use bitman_server::state::{AppState, process_env};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("bitman=info".parse()?))
        .with_target(false)
        .init();

    let api_key =
        std::env::var("BITMAN_SERVER_API_KEY").context("BITMAN_SERVER_API_KEY must be set")?;
    let port = std::env::var("BITMAN_SERVER_PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    let settings_path = std::env::var("BITMAN_SETTINGS").ok().map(PathBuf::from);

    // The timeout is read once; the rest of the settings is re-read per ask.
    let startup = Settings::load(settings_path.as_deref()).context("Failed to load settings")?;
    let transport = ReqwestTransport::from_timeout(startup.request_timeout())
        .context("Failed to create HTTP client")?;

    let state = Arc::new(AppState {
        api_key,
        settings_path,
        transport,
        env: process_env,
    });

    // Extensions call from their own origin.
    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

//! Axum HTTP surface.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::tutor::TutorService;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The dispatcher shared with the WebSocket surface.
    pub tutor: Arc<TutorService>,
    /// Advertised WebSocket port, reported by the status endpoints.
    pub ws_port: u16,
}

/// Build the axum router with all API routes.
pub fn build_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(super::routes::status::root))
        .route("/status", get(super::routes::status::status))
        .route("/generate", post(super::routes::generate::generate))
        .route("/analyze", post(super::routes::analyze::analyze))
        // Body size limit: 1 MiB. Project analysis payloads stay well under
        // this; anything larger is rejected cheaply.
        .layer(DefaultBodyLimit::max(1024 * 1024))
        // The service fronts local editor plugins; accept any origin.
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the HTTP server.
pub async fn start_server(
    config: &Config,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = build_router(state);
    let addr = format!("{}:{}", config.bind, config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP API listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

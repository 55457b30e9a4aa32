//! RealTutor backend entrypoint.
//!
//! Runs the HTTP API and the WebSocket channel as two independent tasks
//! over one shared [`TutorService`].

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use realtutor::api::server::{start_server as start_http_server, AppState};
use realtutor::config::Config;
use realtutor::providers::GroqProvider;
use realtutor::tutor::TutorService;
use realtutor::ws;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let provider = Arc::new(GroqProvider::from_config(
        &config.provider.api_key,
        &config.provider.model,
    ));
    let tutor = Arc::new(TutorService::new(provider, config.cache.capacity));

    info!(
        model = %config.provider.model,
        http_port = config.http_port,
        ws_port = config.ws_port,
        "starting RealTutor backend"
    );

    let http_state = AppState {
        tutor: tutor.clone(),
        ws_port: config.ws_port,
    };
    let http_config = config.clone();
    let http = tokio::spawn(async move { start_http_server(&http_config, http_state).await });

    let ws_config = config.clone();
    let websocket = tokio::spawn(async move { ws::start_server(&ws_config, tutor).await });

    let (http_result, ws_result) = tokio::try_join!(http, websocket)?;
    http_result.map_err(|e| anyhow!("HTTP server failed: {e}"))?;
    ws_result.map_err(|e| anyhow!("WebSocket server failed: {e}"))?;
    Ok(())
}

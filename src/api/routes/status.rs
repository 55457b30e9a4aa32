//! Service status endpoints.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::server::AppState;
use crate::protocol::MODEL_LABEL;

/// GET / — lists the available endpoints.
pub async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "RealTutor AI Backend is running",
        "endpoints": {
            "status": "GET /status",
            "generate": "POST /generate",
            "analyze": "POST /analyze",
            "websocket": format!("ws://localhost:{}", state.ws_port),
        }
    }))
}

/// GET /status — liveness info for editor plugins.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "running",
        "websocket_port": state.ws_port,
        "model": MODEL_LABEL,
    }))
}

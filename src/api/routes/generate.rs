//! POST /generate — one-shot prompt completion.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::api::server::AppState;
use crate::protocol::GenerateRequest;

/// Forward a bare prompt through the question path.
///
/// The prompt travels as the code context with an empty question; the
/// prompt template shows the model the text either way. Provider failures
/// map to a 500 with an `error` body on this endpoint.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> (StatusCode, Json<Value>) {
    match state
        .tutor
        .try_answer_question(&request.prompt, "", "", &request.language)
        .await
    {
        Ok(message) => (StatusCode::OK, Json(json!({ "response": message }))),
        Err(e) => {
            error!("error generating response: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}

//! POST /analyze — single-file or whole-project analysis.

use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::info;

use crate::api::server::AppState;
use crate::protocol::{AnalyzeRequest, ServerEnvelope};

/// Dispatch an analysis request.
///
/// A non-empty `projectFilesDetailed` runs the multi-file path; otherwise
/// the single-file question path. Failures stay inside the response
/// envelope so editor plugins keep one decode path.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<ServerEnvelope> {
    info!(
        file = %request.file_name,
        project_files = request.project_files.len(),
        "analysis request"
    );

    let message = if !request.project_files.is_empty() {
        let files: Vec<(String, String)> = request
            .project_files
            .into_iter()
            .filter(|f| !f.filename.is_empty())
            .map(|f| (f.filename, f.content))
            .collect();
        state
            .tutor
            .analyze_project(&files, &request.user_message, &request.language)
            .await
    } else {
        state
            .tutor
            .answer_question(
                &request.code_context,
                &request.file_name,
                &request.user_message,
                &request.language,
            )
            .await
    };

    Json(ServerEnvelope::response(message))
}

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Readiness summary. Only non-secret configuration is reported.
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let orchestrator = &state.orchestrator;
    let retrieval = orchestrator.retrieval();
    Json(json!({
        "initialized": true,
        "started_at": state.started_at.to_rfc3339(),
        "store": orchestrator.matcher_name(),
        "embedding_model": orchestrator.embedding_model(),
        "generation_model": orchestrator.generation_model(),
        "match_threshold": retrieval.match_threshold,
        "match_count": retrieval.match_count,
    }))
}

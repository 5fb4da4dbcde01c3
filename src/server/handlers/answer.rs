use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::core::errors::{ApiError, EMPTY_QUERY_MESSAGE};
use crate::rag::Query;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub query: String,
}

/// `POST /api/answer`
///
/// 200 for answers and clarifications, 400 for a blank query, 500 when the
/// vector store fails or the body is not a valid request.
pub async fn answer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("answer", request_id = %request_id);

    async move {
        let Json(request) = payload.map_err(|rejection| {
            ApiError::Internal(format!("Malformed answer request: {}", rejection.body_text()))
        })?;

        let query = Query::parse(request.query)
            .map_err(|_| ApiError::BadRequest(EMPTY_QUERY_MESSAGE.to_string()))?;

        let outcome = state.orchestrator.answer(&query).await;
        let status = if outcome.is_failure() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };
        let stage = outcome.terminal_stage();
        let result = outcome.into_result();

        tracing::info!(
            stage = %stage,
            docs = result.docs.len(),
            "Answer request finished with {}",
            status
        );
        Ok::<_, ApiError>((status, Json(result)).into_response())
    }
    .instrument(span)
    .await
}

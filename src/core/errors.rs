use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Shown for anything the caller should not see the details of.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong while answering your question.";

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a question.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Raised while constructing an outbound HTTP client at startup.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("{0} API key is not a valid header value")]
    InvalidApiKey(&'static str),
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        // Internal detail stays in the log, the body only carries fixed text.
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Internal(detail) => {
                tracing::error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = Json(json!({ "message": message, "docs": [] }));
        (status, body).into_response()
    }
}

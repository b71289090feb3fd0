use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors surfaced to HTTP clients. The pipeline does no recovery; whatever
/// the prompt, model client, or parser reports is rendered as-is.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Chain(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Chain(err) = self;
        error!("chain invocation failed: {err:#}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("{err:#}") })),
        )
            .into_response()
    }
}

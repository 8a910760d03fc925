//! Error types for the HTTP surface.

use std::time::Duration;

use analyzer::AnalysisError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors returned by route handlers, rendered as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request body or query string.
    #[error("{0}")]
    BadRequest(String),

    /// No provider key was configured at startup.
    #[error("OpenAI API key not configured")]
    NotConfigured,

    /// The analysis did not finish within the chat deadline.
    #[error("analysis timed out after {0:?}")]
    Timeout(Duration),

    /// Analysis, history or settings failure.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Analysis(err) => match err {
                AnalysisError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                AnalysisError::UpstreamFailure(_) | AnalysisError::EmptyUpstreamResponse { .. } => {
                    StatusCode::BAD_GATEWAY
                }
                AnalysisError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "Request failed: {}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "Request rejected: {}", self);
        }

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for route handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

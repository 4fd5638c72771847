//! Error types for the HTTP handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orchestrator::{ExtractError, OrchestratorError};
use thiserror::Error;

/// Errors a handler can return.
///
/// Rendered as `{"error": ...}` with an optional `"details"` key.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field was missing or empty (400).
    #[error("{0}")]
    Validation(String),

    /// A model call or extraction failed (500).
    #[error("{message}: {source}")]
    Extraction {
        message: &'static str,
        #[source]
        source: ExtractError,
    },

    /// Database error (500).
    #[error("Database error: {0}")]
    Database(#[from] database::DatabaseError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn extraction(message: &'static str, source: ExtractError) -> Self {
        ApiError::Extraction { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Extraction { .. } | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::Validation(msg) => ApiError::Validation(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Validation(msg) => {
                tracing::debug!("Rejected request: {}", msg);
                serde_json::json!({ "error": msg })
            }
            ApiError::Extraction { message, source } => {
                tracing::error!("{}: {}", message, source);
                serde_json::json!({ "error": message, "details": source.to_string() })
            }
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                serde_json::json!({ "error": "Database error", "details": err.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

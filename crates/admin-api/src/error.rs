//! Error types for the admin API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use database::{DatabaseError, ValidationError};

/// Errors that can occur while handling an admin API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Domain or store failure surfaced from the database layer.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Request payload rejected before any store interaction.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Database(err) => match err {
                DatabaseError::NotFound { .. } => StatusCode::NOT_FOUND,
                DatabaseError::AlreadyExists { .. }
                | DatabaseError::SessionAlreadyEnded { .. }
                | DatabaseError::SessionEnded { .. } => StatusCode::CONFLICT,
                DatabaseError::ApiKeyQuotaExceeded { .. } => StatusCode::FORBIDDEN,
                DatabaseError::Sqlx(_) | DatabaseError::Migration(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        };

        let message = self.to_string();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", message);
        } else {
            tracing::warn!("Request rejected: {}", message);
        }

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for admin API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

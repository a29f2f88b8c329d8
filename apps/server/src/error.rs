//! Error types for the HTTP API.
//!
//! ## Status Mapping
//! ```text
//! InvalidInput / validation     → 400 Bad Request
//! InsufficientStock             → 400 Bad Request
//! OutletNotFound / NotFound     → 404 Not Found
//! MenuUnavailable               → 404 Not Found
//! Conflict / UniqueViolation    → 409 Conflict
//! everything else               → 500 Internal Server Error
//! ```
//!
//! Internal faults are logged with their detail but the response body only
//! carries a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use warung_core::ValidationError;
use warung_db::{DbError, OrderError};

/// HTTP API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not found")]
    NotFound,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,

            ApiError::Order(err) => match err {
                OrderError::InvalidInput(_) | OrderError::InsufficientStock { .. } => {
                    StatusCode::BAD_REQUEST
                }
                OrderError::OutletNotFound(_) | OrderError::MenuUnavailable { .. } => {
                    StatusCode::NOT_FOUND
                }
                OrderError::Conflict => StatusCode::CONFLICT,
                OrderError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },

            ApiError::Db(err) => match err {
                DbError::NotFound { .. } => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Busy => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(detail = %self, "Internal error serving request");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

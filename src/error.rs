//! Error types for the Shelfmark server

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Field-keyed validation messages, serialized as `{"errors": {field: [messages]}}`
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Flatten validator output into field-keyed messages
pub fn collect_field_errors(errors: &validator::ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        let messages = errs
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The {} field is invalid", field))
            })
            .collect();
        fields.insert(field.to_string(), messages);
    }
    fields
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(collect_field_errors(&errors))
    }
}

/// Error response body with a single message
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorMessage {
    pub message: String,
}

/// Error response body for authentication failures
#[derive(Serialize, utoipa::ToSchema)]
pub struct AuthErrorBody {
    pub error: String,
}

/// Error response body for validation failures
#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidationErrorBody {
    pub errors: FieldErrors,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorBody { errors }),
            )
                .into_response(),
            AppError::Authentication(error) => {
                (StatusCode::UNAUTHORIZED, Json(AuthErrorBody { error })).into_response()
            }
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorMessage { message })).into_response()
            }
            AppError::Conflict(message) => {
                (StatusCode::CONFLICT, Json(ErrorMessage { message })).into_response()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorMessage {
                        message: "Database error".to_string(),
                    }),
                )
                    .into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorMessage {
                        message: "Internal server error".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

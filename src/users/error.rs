use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use super::validation::Violations;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("validation failed: {0}")]
    ValidationFailed(Violations),

    /// Only produced at the HTTP edge; the store itself answers `None`.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing error: {0}")]
    PasswordHash(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type UserResult<T> = Result<T, UserError>;

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            UserError::ValidationFailed(violations) => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "error": {
                            "type": "validation_failed",
                            "violations": violations,
                        }
                    })),
                )
                    .into_response();
            }
            UserError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password",
            ),
            UserError::PasswordHash(msg) => {
                tracing::error!(error = %msg, "password hash error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred",
                )
            }
            UserError::Storage(e) => {
                tracing::error!(error = %e, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred",
                )
            }
        };

        (
            status,
            Json(json!({
                "error": {
                    "type": error_type,
                    "message": message
                }
            })),
        )
            .into_response()
    }
}

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

use crate::validation::Violation;

pub type AppResult<T> = Result<T, AppError>;

/// Fixed consumer-facing message for anything that went wrong on our side.
/// Persistence and fault details stay in the logs.
pub const GENERIC_FAULT_MESSAGE: &str = "A problem happened while handling your request.";

#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced city or point of interest is absent. Empty 404.
    #[error("not found")]
    NotFound,
    /// Malformed body or edit operation. 400 with a single message.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Failed field constraints or the cross-field rule. 400 carrying the
    /// full accumulated list, never just the first failure.
    #[error("validation failed")]
    Validation(Vec<Violation>),
    /// Persistence failure or unexpected fault. The detail is logged here
    /// and the consumer gets the generic 500.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND.into_response(),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            AppError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": violations })),
            )
                .into_response(),
            AppError::Internal(detail) => {
                tracing::error!(detail = %detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAULT_MESSAGE).into_response()
            }
        }
    }
}

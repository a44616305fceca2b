//! Application error type and its JSON wire shape.
//!
//! Every handler returns `AppResult<T>`; failures serialize as
//! `{ "error": "...", "details": [...] }` with `details` present only for
//! batch validation failures.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::import::ImportError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or unverifiable bearer token (401).
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated but lacking the required role (403).
    #[error("{0}")]
    Forbidden(String),

    /// Malformed request: missing file part, unsupported format, bad query (400).
    #[error("{0}")]
    BadRequest(String),

    /// Batch validation rejection; carries every row-level message (400).
    #[error("Validasi gagal")]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(format!("Invalid multipart body: {err}"))
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Validation(details) => AppError::Validation(details),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Unauthorized" }),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Validasi gagal", "details": details }),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Database(e) => {
                error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            AppError::Internal(e) => {
                error!("Internal error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_variants() {
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("no".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Validation(vec!["Baris 2: email tidak valid".into()])
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("employee".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn unsupported_format_maps_to_bad_request() {
        let err: AppError = ImportError::UnsupportedFormat.into();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}

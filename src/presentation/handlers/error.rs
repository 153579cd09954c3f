use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::AuthError;
use crate::application::services::{AudioServiceError, FolderServiceError};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    TooLong(String),
    #[error("upload failed")]
    UploadFailed,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::TooLong(_) | ApiError::UploadFailed => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<AudioServiceError> for ApiError {
    fn from(err: AudioServiceError) -> Self {
        match err {
            AudioServiceError::Validation(msg) => ApiError::Validation(msg),
            AudioServiceError::NotFound(msg) => ApiError::NotFound(msg),
            AudioServiceError::Forbidden(msg) => ApiError::Forbidden(msg),
            e @ AudioServiceError::TooLong { .. } => ApiError::TooLong(e.to_string()),
            AudioServiceError::UploadFailed => ApiError::UploadFailed,
            AudioServiceError::Repository(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<FolderServiceError> for ApiError {
    fn from(err: FolderServiceError) -> Self {
        match err {
            FolderServiceError::Validation(msg) => ApiError::Validation(msg),
            FolderServiceError::NotFound(msg) => ApiError::NotFound(msg),
            FolderServiceError::Forbidden(msg) => ApiError::Forbidden(msg),
            FolderServiceError::Conflict(msg) => ApiError::Conflict(msg),
            FolderServiceError::Repository(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::capture::CaptureError;
use crate::documents::{LabelError, ReportError};
use crate::settings_editor::EditorError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The capture session is busy
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CaptureError> for ApiError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::Busy => ApiError::Conflict(err.to_string()),
            CaptureError::Storage(e) => ApiError::Storage(e),
            CaptureError::Signature(_) => ApiError::Internal(err.to_string()),
            CaptureError::MissingSignature
            | CaptureError::NoValidReading
            | CaptureError::InvalidReading { .. } => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<LabelError> for ApiError {
    fn from(err: LabelError) -> Self {
        match err {
            LabelError::BlankName => ApiError::Validation(err.to_string()),
            LabelError::Render(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NoEntries { .. } => ApiError::NotFound(err.to_string()),
            ReportError::Render(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<EditorError> for ApiError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::BlankName => ApiError::Validation(err.to_string()),
            EditorError::UnknownFridge(_) => ApiError::NotFound(err.to_string()),
            EditorError::Storage(e) => ApiError::Storage(e),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "BUSY"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

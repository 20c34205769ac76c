//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::processor::ProcessingError;

/// Structured error response body for the upload page.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

pub const MISSING_UPLOAD_MESSAGE: &str = "Please upload all required files.";

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing upload: {0}")]
    MissingUpload(&'static str),
    #[error("Pipeline failed: {0}")]
    Pipeline(String),
    #[error("Rendering failed: {0}")]
    Render(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::MissingUpload(field) => {
                tracing::info!(field, "Run rejected: missing upload");
                (
                    StatusCode::BAD_REQUEST,
                    "MISSING_UPLOAD",
                    MISSING_UPLOAD_MESSAGE.to_string(),
                )
            }
            ApiError::Pipeline(detail) => {
                tracing::warn!(detail, "Justification run failed");
                (StatusCode::BAD_GATEWAY, "PIPELINE_FAILED", detail.clone())
            }
            ApiError::Render(detail) => {
                tracing::error!(detail, "Document rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_FAILED",
                    detail.clone(),
                )
            }
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ProcessingError> for ApiError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::MissingUpload(field) => ApiError::MissingUpload(field),
            ProcessingError::Render(e) => ApiError::Render(e.to_string()),
            e @ (ProcessingError::Extraction(_) | ProcessingError::Summary(_)) => {
                ApiError::Pipeline(e.to_string())
            }
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::BadRequest(err.body_text())
    }
}

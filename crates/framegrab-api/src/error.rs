//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpError>`; layer errors
//! convert into `HttpError` and render consistently (status, JSON body,
//! logging).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use framegrab_processing::PipelineError;
use framegrab_storage::StorageError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// Wrapper type so layer errors can implement IntoResponse despite orphan
/// rules.
#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Pipeline(PipelineError),
    Storage(StorageError),
}

impl From<PipelineError> for HttpError {
    fn from(err: PipelineError) -> Self {
        HttpError::Pipeline(err)
    }
}

impl From<StorageError> for HttpError {
    fn from(err: StorageError) -> Self {
        HttpError::Storage(err)
    }
}

impl HttpError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            HttpError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            HttpError::Storage(StorageError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            HttpError::Storage(StorageError::InvalidKey(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_KEY")
            }
            HttpError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            HttpError::Pipeline(PipelineError::Store(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
            HttpError::Pipeline(PipelineError::Extract(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_ERROR")
            }
            HttpError::Pipeline(PipelineError::Upload(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "UPLOAD_ERROR")
            }
        }
    }

    fn message(&self) -> String {
        match self {
            HttpError::BadRequest(msg) => msg.clone(),
            HttpError::Pipeline(err) => err.to_string(),
            HttpError::Storage(err) => err.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(code = code, error = %message, "Request failed");
        } else {
            tracing::warn!(code = code, error = %message, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

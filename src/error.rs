use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileServerError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Access denied")]
    AccessDenied,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to read directory: {0}")]
    ReadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FileServerError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            FileServerError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            FileServerError::AccessDenied => StatusCode::FORBIDDEN,
            FileServerError::NotFound(_) => StatusCode::NOT_FOUND,
            FileServerError::ReadError(_) | FileServerError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code for JSON bodies.
    pub fn code(&self) -> &'static str {
        match self {
            FileServerError::InvalidPath(_) => "INVALID_PATH",
            FileServerError::AccessDenied => "ACCESS_DENIED",
            FileServerError::NotFound(_) => "NOT_FOUND",
            FileServerError::ReadError(_) => "READ_ERROR",
            FileServerError::Io(_) => "IO_ERROR",
        }
    }
}

#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for FileServerError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        };

        (self.status(), Json(body)).into_response()
    }
}

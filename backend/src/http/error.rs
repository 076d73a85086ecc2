//! HTTP error handling.
//!
//! Every error becomes a complete plain-text response. Malformed point bodies
//! are answered with `500` and the decoder's own message, not `400`.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::services::{IngestError, RenderError};

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Request body did not decode as a point
    MalformedBody(String),
    /// Plot rendering failed
    Render(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// None of these errors is blamed on the client.
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::MalformedBody(msg) | AppError::Render(msg) | AppError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message().to_string(),
        )
            .into_response()
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::MalformedBody(e) => AppError::MalformedBody(e.to_string()),
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Render(err.to_string())
    }
}

//! # REST API Errors
//!
//! Error types for the REST API module. Data-source failures are logged
//! here, once, with their context; the caller only ever sees a generic
//! message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Result type for REST operations
pub type ApiResult<T> = Result<T, ApiError>;

/// REST API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Missing or empty required field
    #[error("{0}")]
    Validation(String),

    /// No row matched the id in the path
    #[error("Not found")]
    NotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Storage failure; any open transaction has already been rolled back
    #[error("Server error while {context}.")]
    DataSource {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    /// Adapter for `map_err`: wraps a store error with what was being done.
    pub fn data_source(context: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::DataSource { context, source }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::DataSource { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::DataSource { context, source } = &self {
            error!(context = *context, error = %source, "Data source error");
        }
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}

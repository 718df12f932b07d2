//! HTTP error responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use tvhub_core::CoreError;

/// Errors returned by the HTTP handlers
///
/// Every variant renders as `{"error": "<message>"}` with the matching status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("KV namespace not bound")]
    StoreUnbound,

    #[error(transparent)]
    Core(#[from] CoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidJson => StatusCode::BAD_REQUEST,
            ApiError::StoreUnbound | ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::StoreUnbound => error!("request needs storage but none is bound"),
            ApiError::Core(e) => error!(error = %e, "storage failure"),
            _ => {}
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

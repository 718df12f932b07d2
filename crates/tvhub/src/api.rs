//! `/api/config` handlers
//!
//! Both methods require the bearer secret. GET returns the stored document
//! text as-is (or the default document); POST replaces it wholesale.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, info};
use tvhub_core::{AppConfig, CoreError, document};

use crate::auth::authorize;
use crate::error::ApiError;
use crate::server::AppState;

#[derive(Serialize)]
struct SaveResponse {
    success: bool,
}

/// Handle GET /api/config
pub async fn get_config(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    authorize(&headers, &state.auth)?;
    let store = state.store()?;

    let text = match document::load_raw(store.as_ref()).await? {
        Some(text) => text,
        None => {
            debug!("no stored configuration, serving default");
            serde_json::to_string(&AppConfig::default()).map_err(CoreError::Serialize)?
        }
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        text,
    )
        .into_response())
}

/// Handle POST /api/config
///
/// The credential is checked before the body is looked at, so a bad key
/// yields 401 whatever the payload.
pub async fn post_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    authorize(&headers, &state.auth)?;
    let store = state.store()?;

    let config: AppConfig = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "rejecting configuration body");
        ApiError::InvalidJson
    })?;

    document::save(store.as_ref(), &config).await?;
    info!(sources = config.sources.len(), "configuration saved");

    Ok((StatusCode::OK, Json(SaveResponse { success: true })).into_response())
}

/// Handle OPTIONS preflight; the CORS layer adds the headers
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

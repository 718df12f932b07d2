//! Public `/subscribe` handler

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tvhub_core::{CoreError, document};

use crate::error::ApiError;
use crate::server::AppState;

pub const FEED_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Handle /subscribe (any method, no credential)
pub async fn subscribe(State(state): State<AppState>) -> Result<Response, ApiError> {
    let store = state.store()?;
    let config = document::load(store.as_ref()).await?;
    let body = config
        .subscribe_feed()
        .to_json_pretty()
        .map_err(CoreError::Serialize)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, FEED_CONTENT_TYPE)],
        body,
    )
        .into_response())
}

//! HTTP server and static asset serving
//!
//! Routes `/api/config` and `/subscribe`, serves the embedded admin UI for
//! everything else, and wraps the lot in permissive CORS and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use rust_embed::RustEmbed;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tvhub_core::SharedStore;

use crate::auth::{AuthState, SharedAuthState};
use crate::error::ApiError;

/// Embedded admin UI
#[derive(RustEmbed)]
#[folder = "ui/"]
struct Assets;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    store: Option<SharedStore>,
    pub auth: SharedAuthState,
}

impl AppState {
    pub fn new(store: Option<SharedStore>, auth: AuthState) -> Self {
        Self {
            store,
            auth: Arc::new(auth),
        }
    }

    /// The bound store, or the "not bound" error
    pub fn store(&self) -> Result<&SharedStore, ApiError> {
        self.store.as_ref().ok_or(ApiError::StoreUnbound)
    }
}

/// Determine Content-Type header for a file path
fn content_type_for(path: &str) -> &'static str {
    if path.ends_with(".html") {
        "text/html; charset=utf-8"
    } else if path.ends_with(".js") {
        "application/javascript; charset=utf-8"
    } else if path.ends_with(".css") {
        "text/css; charset=utf-8"
    } else if path.ends_with(".svg") {
        "image/svg+xml"
    } else if path.ends_with(".png") {
        "image/png"
    } else if path.ends_with(".ico") {
        "image/x-icon"
    } else {
        "application/octet-stream"
    }
}

/// Serve static assets from embedded files
async fn serve_asset(uri: Uri) -> Response {
    let mut path = uri.path().trim_start_matches('/');

    if path.is_empty() {
        path = "index.html";
    }

    match Assets::get(path) {
        Some(content) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type_for(path))],
            content.data,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Build the axum application router
///
/// Separated from `run_server` to enable testing without TCP binding.
pub(crate) fn build_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/config",
            get(crate::api::get_config)
                .post(crate::api::post_config)
                .options(crate::api::preflight),
        )
        .route(
            "/subscribe",
            any(crate::subscribe::subscribe).options(crate::api::preflight),
        )
        .fallback(serve_asset)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until Ctrl-C
pub async fn run_server(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "tvhub server listening");
    }
    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

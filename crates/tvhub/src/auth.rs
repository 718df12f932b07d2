//! Shared-secret authentication for the admin API
//!
//! Callers present `Authorization: Bearer <secret>`. The comparison is an
//! exact string match against the whole header value. When the server has
//! no secret configured, every request is rejected.

use std::sync::Arc;

use axum::http::{HeaderMap, header};
use tracing::warn;

use crate::error::ApiError;

/// Authentication state shared across requests
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    secret: Option<String>,
}

pub type SharedAuthState = Arc<AuthState>;

impl AuthState {
    /// Create auth state; an empty secret counts as unset
    pub fn new(secret: Option<String>) -> Self {
        let secret = secret.filter(|s| !s.is_empty());
        Self { secret }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Check a raw `Authorization` header value
    pub fn check_header(&self, value: Option<&str>) -> bool {
        let (Some(secret), Some(value)) = (self.secret.as_deref(), value) else {
            return false;
        };
        match value.strip_prefix("Bearer ") {
            Some(token) => token == secret,
            None => false,
        }
    }
}

/// Return the `Authorization` header as text, if present and valid UTF-8
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Reject the request unless it carries the configured bearer secret
pub fn authorize(headers: &HeaderMap, auth: &AuthState) -> Result<(), ApiError> {
    if auth.check_header(authorization_header(headers)) {
        return Ok(());
    }
    if !auth.is_configured() {
        warn!("rejecting admin request: no shared secret configured");
    } else {
        warn!("rejecting admin request: missing or wrong bearer token");
    }
    Err(ApiError::Unauthorized)
}

//! Access gate middleware.
//!
//! Every protected route requires the shared secret in `Authorization`
//! (raw or `Bearer <key>`) or `X-API-Key`.

use crate::error::ApiError;
use crate::server::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use waitline_core::port::AccessGate;

/// Access gate backed by a single static shared secret
pub struct StaticKeyGate {
    api_key: String,
}

impl StaticKeyGate {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl AccessGate for StaticKeyGate {
    fn admits(&self, credential: Option<&str>) -> bool {
        match credential {
            Some(presented) => constant_time_compare(presented, &self.api_key),
            None => false,
        }
    }
}

/// Constant-time string comparison
///
/// Takes the same time regardless of how many leading characters match.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    // Pad both to the longer length; different pad bytes force a mismatch
    let max_len = std::cmp::max(a.len(), b.len());

    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];

    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);

    (lengths_equal & contents_equal).into()
}

/// Credential presented by the caller, if any
fn presented_credential(headers: &HeaderMap) -> Option<&str> {
    if let Some(auth) = headers.get("authorization") {
        if let Ok(auth_str) = auth.to_str() {
            return Some(auth_str.strip_prefix("Bearer ").unwrap_or(auth_str));
        }
    }

    headers
        .get("x-api-key")
        .and_then(|key| key.to_str().ok())
}

/// Reject requests the access gate does not admit with 403
pub async fn require_credential(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if state.gate.admits(presented_credential(req.headers())) {
        debug!(path = %req.uri().path(), "Credential accepted");
        return next.run(req).await;
    }

    warn!(
        method = %req.method(),
        path = %req.uri().path(),
        "Access denied - missing or invalid credential"
    );
    ApiError::forbidden().into_response()
}

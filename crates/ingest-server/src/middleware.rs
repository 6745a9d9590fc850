use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::fmt;
use std::sync::Arc;

use crate::api::ApiError;
use crate::AppState;

/// Header carrying the caller's credential.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Value used when no key is configured. Anyone who has read the source
/// knows it, so a server still using it is effectively unauthenticated.
pub const PLACEHOLDER_API_KEY: &str = "CHANGE_ME_TO_A_LONG_RANDOM_SECRET";

/// The shared secret every authenticated request must present.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Exact string comparison with a presented credential.
    pub fn matches(&self, presented: &str) -> bool {
        *self.0 == *presented
    }

    /// Returns `true` if this is the built-in [`PLACEHOLDER_API_KEY`].
    pub fn is_placeholder(&self) -> bool {
        self.matches(PLACEHOLDER_API_KEY)
    }
}

impl Default for ApiKey {
    fn default() -> Self {
        Self::new(PLACEHOLDER_API_KEY)
    }
}

// Never print the secret.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Middleware to authenticate requests via the `X-API-Key` header.
///
/// Runs before any body or query extraction, so an unauthenticated request
/// gets `401` whatever else is wrong with it. A header that is missing, not
/// valid UTF-8, or different from the configured key is rejected the same
/// way.
pub async fn api_key_middleware(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let state = req
        .extensions()
        .get::<Arc<AppState>>()
        .ok_or_else(|| ApiError::Storage("application state missing".to_string()))?
        .clone();

    let rejection = match req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(key) if state.api_key.matches(key) => None,
        Some(_) => Some("wrong api key"),
        None => Some("missing api key"),
    };

    if let Some(reason) = rejection {
        tracing::debug!(path = %req.uri().path(), reason, "rejected unauthenticated request");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}

//! Authentication middleware
//!
//! [`auth_middleware`] runs in front of every `/api/v3` route. It stores the
//! caller's [`AuthContext`] in the request extensions, where handlers pick it
//! up through [`AuthExtractor`]. Failures answer 401 with an [`ApiError`] body.

use crate::auth::{authenticate, AuthConfig, AuthContext};
use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
pub struct AuthMiddlewareState {
    pub auth_config: Arc<AuthConfig>,
}

impl AuthMiddlewareState {
    pub fn new(auth_config: AuthConfig) -> Self {
        Self {
            auth_config: Arc::new(auth_config),
        }
    }
}

fn header<'a>(headers: &'a HeaderMap, name: impl axum::http::header::AsHeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Authenticate the request, then hand it on with its [`AuthContext`].
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = request.headers();
    let auth_context = authenticate(
        &state.auth_config,
        header(headers, API_KEY_HEADER),
        header(headers, AUTHORIZATION),
    )
    .inspect_err(|e| tracing::debug!(error = %e, "Authentication failed"))?;

    request.extensions_mut().insert(auth_context);
    Ok(next.run(request).await)
}

/// The authenticated caller of the current request.
///
/// Only valid behind [`auth_middleware`]; elsewhere it fails with 500.
#[derive(Debug, Clone)]
pub struct AuthExtractor(pub AuthContext);

#[async_trait]
impl<S> FromRequestParts<S> for AuthExtractor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthExtractor)
            .ok_or_else(|| ApiError::internal_error("Route is missing auth_middleware"))
    }
}

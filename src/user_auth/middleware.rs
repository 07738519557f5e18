use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::sync::Arc;

use super::service::CallerIdentity;
use crate::gateway::state::AppState;

/// Extractor for the optional caller identity set by [`identity_middleware`].
#[derive(Debug, Clone)]
pub struct Caller(pub Option<CallerIdentity>);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Caller(parts.extensions.get::<CallerIdentity>().cloned()))
    }
}

/// Attach a [`CallerIdentity`] when the request carries a valid bearer
/// token.
///
/// Never rejects on its own: a missing or invalid token simply leaves the
/// request anonymous and the operation decides whether that is allowed.
pub async fn identity_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    if let Some(token) = token
        && let Some(identity) = state.identity.identify(&token)
    {
        request.extensions_mut().insert(identity);
    }

    next.run(request).await
}

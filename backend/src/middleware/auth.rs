//! Authentication middleware
//!
//! Bearer-token gate in front of every protected route. The token must
//! belong to the live session; each accepted request slides its expiry.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::services::ActiveSession;
use crate::AppState;

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Session gate for protected routes
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()).map(str::to_owned) else {
        return AppError::Unauthorized("Missing or invalid Authorization header".to_string())
            .into_response();
    };

    let timeout = state
        .registry
        .read()
        .await
        .settings()
        .auth
        .session_timeout_secs;

    let session = match state.session.lock().await.authorize(&token, timeout) {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(session);
    next.run(request).await
}

/// Extractor for the session that passed the gate
/// Use this in handlers that need to know who is logged in
#[derive(Clone, Debug)]
pub struct CurrentSession(pub ActiveSession);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ActiveSession>()
            .cloned()
            .map(CurrentSession)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

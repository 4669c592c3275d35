//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::CurrentSession;
use crate::services::session::check_credentials;
use crate::services::ActiveSession;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl From<ActiveSession> for LoginResponse {
    fn from(session: ActiveSession) -> Self {
        Self {
            access_token: session.token,
            token_type: "Bearer".to_string(),
            username: session.username,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let auth = state.registry.read().await.settings().auth.clone();

    let LoginRequest { username, password } = body;
    let credentials = auth.clone();
    tokio::task::spawn_blocking(move || {
        check_credentials(&credentials, username.trim(), &password)
    })
    .await
    .map_err(|e| AppError::Internal(format!("login task failed: {}", e)))??;

    let session = state.session.lock().await.start(&auth)?;

    Ok(Json(session.into()))
}

/// Logout endpoint handler
pub async fn logout(
    State(state): State<AppState>,
    _session: CurrentSession,
) -> Result<StatusCode, AppError> {
    state.session.lock().await.logout()?;
    Ok(StatusCode::NO_CONTENT)
}

/// Describe the current session; reaching this handler already extended it
pub async fn current_session(session: CurrentSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        username: session.0.username,
        expires_at: session.0.expires_at,
    })
}

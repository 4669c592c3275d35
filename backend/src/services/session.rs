//! Single-user session with a sliding idle timeout
//!
//! There is exactly one account (the credentials in [`AuthSettings`]) and at
//! most one live session. Every authorized request pushes the expiry forward
//! by the configured timeout; once it passes, the session reverts to
//! anonymous.

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared::AuthSettings;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::SharedClock;
use crate::error::{AppError, AppResult};
use crate::storage::{self, Loaded, StateKey, Storage};

/// Upper bound on the idle timeout; keeps expiry arithmetic in range
const MAX_TIMEOUT_SECS: i64 = 366 * 86_400;

/// Hash a password for storing in the settings file
pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    Ok(hash(password, cost)?)
}

/// Check a password against a stored hash
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    Ok(verify(password, password_hash)?)
}

/// Check a login attempt against the configured credentials.
///
/// Runs bcrypt, so async callers move it onto the blocking pool before
/// taking the session lock.
pub fn check_credentials(auth: &AuthSettings, username: &str, password: &str) -> AppResult<()> {
    if username != auth.username || !verify_password(password, &auth.password_hash)? {
        warn!(username, "Rejected login attempt");
        return Err(AppError::InvalidCredentials);
    }
    Ok(())
}

/// The authenticated session as persisted in `session.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveSession {
    pub username: String,
    /// Opaque bearer token
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated(ActiveSession),
}

pub struct SessionGuard {
    storage: Arc<dyn Storage>,
    clock: SharedClock,
    state: SessionState,
}

impl SessionGuard {
    /// Start anonymous, ignoring any persisted session
    pub fn new(storage: Arc<dyn Storage>, clock: SharedClock) -> Self {
        Self {
            storage,
            clock,
            state: SessionState::Anonymous,
        }
    }

    /// Resume the persisted session if it has not expired yet
    pub fn restore(storage: Arc<dyn Storage>, clock: SharedClock) -> AppResult<Self> {
        let mut guard = Self::new(storage, clock);

        match storage::load::<ActiveSession>(guard.storage.as_ref(), StateKey::Session)? {
            Loaded::Found(session) if session.expires_at > guard.clock.now() => {
                info!(username = %session.username, "Session restored");
                guard.state = SessionState::Authenticated(session);
            }
            Loaded::Found(_) => {
                debug!("Stored session already expired");
                guard.storage.remove(StateKey::Session)?;
            }
            Loaded::Missing | Loaded::Corrupt => {}
        }

        Ok(guard)
    }

    pub fn current(&self) -> Option<&ActiveSession> {
        match &self.state {
            SessionState::Authenticated(session) => Some(session),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Authenticate against the configured credentials.
    ///
    /// A successful login replaces any existing session. A failed one leaves
    /// the current state untouched.
    pub fn login(
        &mut self,
        auth: &AuthSettings,
        username: &str,
        password: &str,
    ) -> AppResult<ActiveSession> {
        check_credentials(auth, username, password)?;
        self.start(auth)
    }

    /// Open a fresh session for credentials that were already checked,
    /// replacing any existing one
    pub fn start(&mut self, auth: &AuthSettings) -> AppResult<ActiveSession> {
        let session = ActiveSession {
            username: auth.username.clone(),
            token: Uuid::new_v4().simple().to_string(),
            expires_at: self.expiry_from_now(auth.session_timeout_secs),
        };

        storage::save(self.storage.as_ref(), StateKey::Session, &session)?;
        self.state = SessionState::Authenticated(session.clone());

        info!(username = %session.username, "Logged in");
        Ok(session)
    }

    /// End the session
    pub fn logout(&mut self) -> AppResult<()> {
        if let SessionState::Authenticated(session) = &self.state {
            info!(username = %session.username, "Logged out");
        }
        self.state = SessionState::Anonymous;
        self.storage.remove(StateKey::Session)
    }

    /// Expire the session if its deadline has passed; true while still live
    pub fn check(&mut self) -> bool {
        let Some(session) = self.current() else {
            return false;
        };
        if session.expires_at > self.clock.now() {
            return true;
        }

        info!(username = %session.username, "Session expired");
        self.state = SessionState::Anonymous;
        if let Err(e) = self.storage.remove(StateKey::Session) {
            warn!(error = %e, "Could not delete expired session");
        }
        false
    }

    /// Slide the expiry forward. Persisting the new deadline is best effort:
    /// a failed write only shortens the session after a restart.
    pub fn touch(&mut self, timeout_secs: u64) {
        let expires_at = self.expiry_from_now(timeout_secs);
        let SessionState::Authenticated(session) = &mut self.state else {
            return;
        };
        session.expires_at = expires_at;

        if let Err(e) = storage::save(self.storage.as_ref(), StateKey::Session, &*session) {
            warn!(error = %e, "Could not persist session expiry");
        }
    }

    /// Gate for protected requests: the token must belong to a live session.
    /// On success the session is extended.
    pub fn authorize(&mut self, token: &str, timeout_secs: u64) -> AppResult<ActiveSession> {
        let was_authenticated = self.is_authenticated();
        if !self.check() {
            return Err(if was_authenticated {
                AppError::SessionExpired
            } else {
                AppError::Unauthorized("No active session".to_string())
            });
        }

        match self.current() {
            Some(session) if session.token == token => {}
            _ => return Err(AppError::Unauthorized("Invalid session token".to_string())),
        }

        self.touch(timeout_secs);
        self.current()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("No active session".to_string()))
    }

    fn expiry_from_now(&self, timeout_secs: u64) -> DateTime<Utc> {
        let secs = i64::try_from(timeout_secs)
            .unwrap_or(MAX_TIMEOUT_SECS)
            .min(MAX_TIMEOUT_SECS);
        self.clock.now() + Duration::seconds(secs)
    }
}

// src/auth/sessions.rs
use crate::auth::access::{AccessCodes, AuthError};
use crate::auth::token::{digest, new_session_token, Digest32};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Per-visitor state. Starts unauthenticated and has no expiry.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    /// One-shot warning shown on the next page render.
    flash: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: SessionState::Unauthenticated,
            flash: None,
        }
    }
}

impl Session {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Unauthenticated --(matching code)--> Authenticated.
    /// A wrong code leaves the state untouched.
    pub fn submit_code(&mut self, codes: &AccessCodes, candidate: &str) -> Result<(), AuthError> {
        if codes.verify(candidate) {
            self.state = SessionState::Authenticated;
            Ok(())
        } else {
            Err(AuthError::InvalidCode)
        }
    }

    /// Any state --(logout)--> Unauthenticated.
    pub fn logout(&mut self) {
        self.state = SessionState::Unauthenticated;
        self.flash = None;
    }
}

/// In-memory sessions keyed by the digest of their cookie token.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Digest32, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Digest32, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// State for a cookie token; unknown or absent tokens are unauthenticated.
    pub fn state(&self, token: Option<&str>) -> SessionState {
        token
            .and_then(|t| self.lock().get(&digest(t)).map(Session::state))
            .unwrap_or(SessionState::Unauthenticated)
    }

    pub fn is_authenticated(&self, token: Option<&str>) -> bool {
        self.state(token) == SessionState::Authenticated
    }

    /// Submit an access code for the visitor holding `token` (if any).
    /// On success returns the token the browser must keep; a new one is
    /// issued when the visitor had no known session.
    pub fn login(
        &self,
        codes: &AccessCodes,
        token: Option<&str>,
        candidate: &str,
    ) -> Result<String, AuthError> {
        let mut sessions = self.lock();

        let known = token.filter(|t| sessions.contains_key(&digest(t)));
        let token = match known {
            Some(t) => t.to_string(),
            None => new_session_token(),
        };
        let key = digest(&token);

        let mut session = sessions.get(&key).cloned().unwrap_or_default();
        match session.submit_code(codes, candidate) {
            Ok(()) => {
                sessions.insert(key, session);
                info!(sessions = sessions.len(), "access code accepted");
                Ok(token)
            }
            Err(e) => {
                info!("access code rejected");
                Err(e)
            }
        }
    }

    /// Drop the visitor back to unauthenticated and forget the session.
    pub fn logout(&self, token: Option<&str>) {
        let Some(token) = token else { return };
        let mut sessions = self.lock();
        if let Some(mut session) = sessions.remove(&digest(token)) {
            session.logout();
            debug!(sessions = sessions.len(), "session logged out");
        }
    }

    pub fn set_flash(&self, token: Option<&str>, message: impl Into<String>) {
        let Some(token) = token else { return };
        if let Some(session) = self.lock().get_mut(&digest(token)) {
            session.flash = Some(message.into());
        }
    }

    pub fn take_flash(&self, token: Option<&str>) -> Option<String> {
        let token = token?;
        self.lock()
            .get_mut(&digest(token))
            .and_then(|session| session.flash.take())
    }
}

/// Pull the session token out of a `Cookie` header value.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

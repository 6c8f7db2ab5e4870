//! In-memory session store for tests
//!
//! Sessions are plain tokens in the `mock-session` cookie. Each token is
//! valid, expired (refresh rotates it), or unknown. Every call is recorded
//! so tests can assert how many identity checks and refreshes ran, and in
//! which order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use axum_extra::extract::cookie::Cookie;
use time::Duration;
use uuid::Uuid;

use crate::cookies::{RequestCookies, SessionRefresh};
use crate::error::AuthError;
use crate::store::{SessionReader, SessionRefresher, SessionStore};
use crate::types::AuthIdentity;

pub const MOCK_SESSION_COOKIE: &str = "mock-session";

/// Calls made against the mock, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCall {
    CurrentUser,
    Refresh,
    SignIn,
    SignOut,
}

#[derive(Debug, Clone)]
enum MockSession {
    Valid(AuthIdentity),
    Expired(AuthIdentity),
}

/// Session store double with call recording
#[derive(Debug, Default)]
pub struct MockSessionStore {
    sessions: Mutex<HashMap<String, MockSession>>,
    credentials: Mutex<HashMap<(String, String), AuthIdentity>>,
    calls: Mutex<Vec<MockCall>>,
    provider_down: AtomicBool,
    refresh_broken: AtomicBool,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(email: &str) -> AuthIdentity {
        AuthIdentity {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        }
    }

    /// Register a valid session token
    pub fn with_session(self, token: &str, identity: AuthIdentity) -> Self {
        self.lock_sessions()
            .insert(token.to_string(), MockSession::Valid(identity));
        self
    }

    /// Register a token whose access token has expired but can be rotated
    pub fn with_expired_session(self, token: &str, identity: AuthIdentity) -> Self {
        self.lock_sessions()
            .insert(token.to_string(), MockSession::Expired(identity));
        self
    }

    pub fn with_credentials(self, email: &str, password: &str, identity: AuthIdentity) -> Self {
        self.credentials
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((email.to_string(), password.to_string()), identity);
        self
    }

    /// Make identity checks fail with a provider error
    pub fn set_provider_down(&self, down: bool) {
        self.provider_down.store(down, Ordering::SeqCst);
    }

    /// Make refresh calls fail
    pub fn set_refresh_broken(&self, broken: bool) {
        self.refresh_broken.store(broken, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn count(&self, call: MockCall) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn record(&self, call: MockCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn lock_sessions(&self) -> std::sync::MutexGuard<'_, HashMap<String, MockSession>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn session_cookie(value: String) -> Cookie<'static> {
        Cookie::build((MOCK_SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .build()
    }

    fn removal() -> Cookie<'static> {
        Cookie::build((MOCK_SESSION_COOKIE, ""))
            .path("/")
            .max_age(Duration::ZERO)
            .build()
    }
}

#[async_trait::async_trait]
impl SessionReader for MockSessionStore {
    async fn current_user(
        &self,
        cookies: &RequestCookies,
    ) -> Result<Option<AuthIdentity>, AuthError> {
        self.record(MockCall::CurrentUser);

        if self.provider_down.load(Ordering::SeqCst) {
            return Err(AuthError::Provider("mock provider down".to_string()));
        }

        let Some(token) = cookies.get(MOCK_SESSION_COOKIE) else {
            return Ok(None);
        };

        Ok(match self.lock_sessions().get(token) {
            Some(MockSession::Valid(user)) | Some(MockSession::Expired(user)) => Some(user.clone()),
            None => None,
        })
    }
}

#[async_trait::async_trait]
impl SessionRefresher for MockSessionStore {
    async fn refresh(&self, cookies: &RequestCookies) -> Result<SessionRefresh, AuthError> {
        self.record(MockCall::Refresh);

        if self.refresh_broken.load(Ordering::SeqCst) {
            return Err(AuthError::SessionRefreshFailed(
                "mock refresh broken".to_string(),
            ));
        }

        let Some(token) = cookies.get(MOCK_SESSION_COOKIE) else {
            return Ok(SessionRefresh::unchanged());
        };

        let mut sessions = self.lock_sessions();
        let refresh = match sessions.get(token).cloned() {
            Some(MockSession::Valid(_)) => SessionRefresh::unchanged(),
            Some(MockSession::Expired(user)) => {
                let rotated = format!("{}-rotated", token);
                sessions.insert(rotated.clone(), MockSession::Valid(user));
                SessionRefresh::with_cookies(vec![Self::session_cookie(rotated)])
            }
            None => SessionRefresh::with_cookies(vec![Self::removal()]),
        };

        Ok(refresh)
    }
}

#[async_trait::async_trait]
impl SessionStore for MockSessionStore {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
        _existing: &RequestCookies,
    ) -> Result<(AuthIdentity, SessionRefresh), AuthError> {
        self.record(MockCall::SignIn);

        let identity = self
            .credentials
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(email.to_string(), password.to_string()))
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        let token = format!("session-{}", identity.id.simple());
        self.lock_sessions()
            .insert(token.clone(), MockSession::Valid(identity.clone()));

        Ok((
            identity,
            SessionRefresh::with_cookies(vec![Self::session_cookie(token)]),
        ))
    }

    async fn sign_out(&self, cookies: &RequestCookies) -> Result<SessionRefresh, AuthError> {
        self.record(MockCall::SignOut);

        if let Some(token) = cookies.get(MOCK_SESSION_COOKIE) {
            self.lock_sessions().remove(token);
            return Ok(SessionRefresh::with_cookies(vec![Self::removal()]));
        }
        Ok(SessionRefresh::unchanged())
    }
}

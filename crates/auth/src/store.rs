//! Session store seams
//!
//! Reading and refreshing are separate capabilities. The reader answers
//! "who is this?" and can only ever return an identity; the refresher is
//! the one place cookie mutations come from. The gate holds them as two
//! distinct handles so an identity check can never leak cookie writes onto
//! a response that is about to be discarded.

use std::sync::Arc;

use crate::cookies::{RequestCookies, SessionRefresh};
use crate::error::AuthError;
use crate::types::AuthIdentity;

/// Read-only identity lookup
#[async_trait::async_trait]
pub trait SessionReader: Send + Sync {
    /// Verify the request's session with the identity provider.
    ///
    /// `Ok(None)` means no valid session. Implementations must ask the
    /// provider on every call; results are never cached.
    async fn current_user(
        &self,
        cookies: &RequestCookies,
    ) -> Result<Option<AuthIdentity>, AuthError>;
}

/// Stateful session refresh
#[async_trait::async_trait]
pub trait SessionRefresher: Send + Sync {
    /// Re-validate the session and return the cookie mutations that bring
    /// the client in sync (rotation, clearing, or nothing).
    async fn refresh(&self, cookies: &RequestCookies) -> Result<SessionRefresh, AuthError>;
}

/// Full session store used by the login endpoints
#[async_trait::async_trait]
pub trait SessionStore: SessionReader + SessionRefresher {
    /// Exchange credentials for a session; returns the cookies to set
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
        existing: &RequestCookies,
    ) -> Result<(AuthIdentity, SessionRefresh), AuthError>;

    /// Revoke the session (best effort) and return cookie removals
    async fn sign_out(&self, cookies: &RequestCookies) -> Result<SessionRefresh, AuthError>;
}

/// Handles to one store, viewed through each capability
#[derive(Clone)]
pub struct SessionHandles {
    pub reader: Arc<dyn SessionReader>,
    pub refresher: Arc<dyn SessionRefresher>,
    pub store: Arc<dyn SessionStore>,
}

impl SessionHandles {
    pub fn from_store<T>(store: Arc<T>) -> Self
    where
        T: SessionStore + 'static,
    {
        Self {
            reader: store.clone(),
            refresher: store.clone(),
            store,
        }
    }
}

/// Store used when no identity provider is configured.
///
/// Finds no one, refreshes nothing, and refuses sign-in.
#[derive(Debug, Clone, Default)]
pub struct DisabledSessionStore;

#[async_trait::async_trait]
impl SessionReader for DisabledSessionStore {
    async fn current_user(
        &self,
        _cookies: &RequestCookies,
    ) -> Result<Option<AuthIdentity>, AuthError> {
        Ok(None)
    }
}

#[async_trait::async_trait]
impl SessionRefresher for DisabledSessionStore {
    async fn refresh(&self, _cookies: &RequestCookies) -> Result<SessionRefresh, AuthError> {
        Ok(SessionRefresh::unchanged())
    }
}

#[async_trait::async_trait]
impl SessionStore for DisabledSessionStore {
    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
        _existing: &RequestCookies,
    ) -> Result<(AuthIdentity, SessionRefresh), AuthError> {
        Err(AuthError::AuthDisabled)
    }

    async fn sign_out(&self, _cookies: &RequestCookies) -> Result<SessionRefresh, AuthError> {
        Ok(SessionRefresh::unchanged())
    }
}

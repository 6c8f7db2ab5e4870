//! Identity and session types exchanged with the session store

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::claims::AccessTokenClaims;

/// Authenticated user as asserted by the identity provider.
///
/// The gate only checks for its presence; it never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIdentity {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session persisted in the auth cookie.
///
/// Field names follow the Supabase Auth token response so the same JSON is
/// both what the provider returns and what the cookie carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthIdentity>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl StoredSession {
    /// Absolute expiry (unix seconds).
    ///
    /// Token responses carry `expires_in` only; cookies written by other
    /// clients may carry neither, in which case the access token's `exp`
    /// claim is used.
    pub fn expiry(&self, issued_at: i64) -> Option<i64> {
        self.expires_at
            .or_else(|| self.expires_in.map(|secs| issued_at + secs))
            .or_else(|| AccessTokenClaims::peek(&self.access_token).map(|c| c.exp as i64))
    }

    /// Fill in `expires_at` for a freshly issued token response
    pub fn stamped(mut self, now: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self.expiry(now);
        }
        self
    }

    /// Whether the access token expires within `margin_secs` of `now`.
    ///
    /// A session with no determinable expiry is treated as expiring so it
    /// gets exchanged instead of trusted.
    pub fn is_expiring(&self, now: i64, margin_secs: i64) -> bool {
        match self.expiry(now) {
            Some(expires_at) => expires_at - now <= margin_secs,
            None => true,
        }
    }
}

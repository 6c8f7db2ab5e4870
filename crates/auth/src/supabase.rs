//! Supabase Auth session store
//!
//! Talks to the GoTrue REST API (`/auth/v1/*`) with reqwest. Every identity
//! check is a live `GET /auth/v1/user`; nothing is cached between requests.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::cookies::{RequestCookies, SessionCookieCodec, SessionCookieState, SessionRefresh};
use crate::error::AuthError;
use crate::store::{SessionReader, SessionRefresher, SessionStore};
use crate::types::{AuthIdentity, StoredSession};

/// Refresh access tokens this close to expiry (three 30s ticks, as
/// supabase-js does)
const EXPIRY_MARGIN_SECS: i64 = 90;

/// User object returned by `GET /auth/v1/user`
#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: Uuid,
    email: Option<String>,
}

#[derive(Debug, Serialize)]
struct RefreshTokenGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

enum UserLookup {
    Found(AuthIdentity),
    Rejected,
}

enum TokenExchange {
    Issued(StoredSession),
    Rejected,
}

/// Session store backed by Supabase Auth
#[derive(Debug, Clone)]
pub struct SupabaseSessionStore {
    client: Client,
    config: AuthConfig,
    codec: SessionCookieCodec,
}

impl SupabaseSessionStore {
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: AuthConfig, client: Client) -> Self {
        let codec = SessionCookieCodec::new(config.cookie_name(), config.cookie_secure);
        Self {
            client,
            config,
            codec,
        }
    }

    pub fn codec(&self) -> &SessionCookieCodec {
        &self.codec
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.supabase_url, path)
    }

    #[mutants::skip] // Wall clock; expiry logic is covered on StoredSession
    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    async fn fetch_user(&self, access_token: &str) -> Result<UserLookup, AuthError> {
        let response = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("user lookup: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let user: ProviderUser = response
                .json()
                .await
                .map_err(|e| AuthError::Provider(format!("user lookup body: {}", e)))?;
            return Ok(UserLookup::Found(AuthIdentity {
                id: user.id,
                email: user.email,
            }));
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(UserLookup::Rejected),
            other => Err(AuthError::Provider(format!(
                "user lookup returned {}",
                other
            ))),
        }
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<TokenExchange, AuthError> {
        let response = self
            .client
            .post(self.endpoint("token?grant_type=refresh_token"))
            .header("apikey", &self.config.anon_key)
            .json(&RefreshTokenGrant { refresh_token })
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("token refresh: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let session: StoredSession = response
                .json()
                .await
                .map_err(|e| AuthError::Provider(format!("token refresh body: {}", e)))?;
            return Ok(TokenExchange::Issued(session.stamped(Self::now())));
        }

        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Ok(TokenExchange::Rejected)
            }
            other => Err(AuthError::Provider(format!(
                "token refresh returned {}",
                other
            ))),
        }
    }
}

/// Refresh failures are fatal for the request, whatever their cause
fn refresh_failure(err: AuthError) -> AuthError {
    match err {
        AuthError::Provider(msg) => AuthError::SessionRefreshFailed(msg),
        other => other,
    }
}

#[async_trait::async_trait]
impl SessionReader for SupabaseSessionStore {
    async fn current_user(
        &self,
        cookies: &RequestCookies,
    ) -> Result<Option<AuthIdentity>, AuthError> {
        let session = match self.codec.read(cookies) {
            SessionCookieState::Present(session) => session,
            SessionCookieState::Absent | SessionCookieState::Invalid => return Ok(None),
        };

        // A token that is still valid is verified as is, even inside the
        // refresh margin: refresh tokens are single-use, and the refresher
        // exchanges it right after. Only an expired token is exchanged here,
        // in memory; persisting the rotated session is the refresher's job.
        let access_token = if session.is_expiring(Self::now(), 0) {
            match self.exchange_refresh_token(&session.refresh_token).await? {
                TokenExchange::Issued(fresh) => fresh.access_token,
                TokenExchange::Rejected => return Ok(None),
            }
        } else {
            session.access_token
        };

        match self.fetch_user(&access_token).await? {
            UserLookup::Found(user) => Ok(Some(user)),
            UserLookup::Rejected => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl SessionRefresher for SupabaseSessionStore {
    async fn refresh(&self, cookies: &RequestCookies) -> Result<SessionRefresh, AuthError> {
        let session = match self.codec.read(cookies) {
            SessionCookieState::Present(session) => session,
            SessionCookieState::Absent => {
                // Orphaned chunks from an interrupted write
                return Ok(SessionRefresh::with_cookies(self.codec.clear(cookies)));
            }
            SessionCookieState::Invalid => {
                tracing::debug!(cookie = %self.codec.name(), "Clearing undecodable session cookie");
                return Ok(SessionRefresh::with_cookies(self.codec.clear(cookies)));
            }
        };

        if session.is_expiring(Self::now(), EXPIRY_MARGIN_SECS) {
            return match self
                .exchange_refresh_token(&session.refresh_token)
                .await
                .map_err(refresh_failure)?
            {
                TokenExchange::Issued(fresh) => {
                    tracing::debug!("Rotated expiring session");
                    Ok(SessionRefresh::with_cookies(self.codec.write(&fresh, cookies)?))
                }
                TokenExchange::Rejected => {
                    tracing::debug!("Refresh token rejected, clearing session");
                    Ok(SessionRefresh::with_cookies(self.codec.clear(cookies)))
                }
            };
        }

        match self
            .fetch_user(&session.access_token)
            .await
            .map_err(refresh_failure)?
        {
            UserLookup::Found(_) => Ok(SessionRefresh::unchanged()),
            UserLookup::Rejected => {
                tracing::debug!("Access token rejected, clearing session");
                Ok(SessionRefresh::with_cookies(self.codec.clear(cookies)))
            }
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for SupabaseSessionStore {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
        existing: &RequestCookies,
    ) -> Result<(AuthIdentity, SessionRefresh), AuthError> {
        let response = self
            .client
            .post(self.endpoint("token?grant_type=password"))
            .header("apikey", &self.config.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("password sign-in: {}", e)))?;

        let status = response.status();
        if matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(AuthError::Provider(format!(
                "password sign-in returned {}",
                status
            )));
        }

        let session: StoredSession = response
            .json::<StoredSession>()
            .await
            .map_err(|e| AuthError::Provider(format!("password sign-in body: {}", e)))?
            .stamped(Self::now());

        let identity = match &session.user {
            Some(user) => user.clone(),
            None => match self.fetch_user(&session.access_token).await? {
                UserLookup::Found(user) => user,
                UserLookup::Rejected => return Err(AuthError::InvalidCredentials),
            },
        };

        tracing::info!(user_id = %identity.id, "User signed in");

        let cookies = self.codec.write(&session, existing)?;
        Ok((identity, SessionRefresh::with_cookies(cookies)))
    }

    async fn sign_out(&self, cookies: &RequestCookies) -> Result<SessionRefresh, AuthError> {
        if let SessionCookieState::Present(session) = self.codec.read(cookies) {
            let result = self
                .client
                .post(self.endpoint("logout?scope=local"))
                .header("apikey", &self.config.anon_key)
                .bearer_auth(&session.access_token)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {}
                Ok(response) => {
                    tracing::warn!(status = %response.status(), "Provider sign-out rejected")
                }
                Err(e) => tracing::warn!(error = %e, "Provider sign-out failed"),
            }
        }

        Ok(SessionRefresh::with_cookies(self.codec.clear(cookies)))
    }
}

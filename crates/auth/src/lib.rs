//! Session gate for Folio
//!
//! Runs before routing on every request: classifies the path, verifies the
//! user with the identity provider on Protected paths, and keeps the
//! Supabase session cookies fresh. Also provides the read-only
//! [`SessionUser`] extractor for handlers behind the gate.

mod claims;
mod config;
mod cookies;
mod error;
mod extractors;
mod gate;
mod middleware;
mod redirect;
mod store;
mod supabase;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use config::{AuthConfig, AuthMode};
pub use cookies::{RequestCookies, SessionCookieCodec, SessionCookieState, SessionRefresh};
pub use error::AuthError;
pub use extractors::SessionUser;
pub use gate::{GateDecision, PathClass, PathMatcher, PathRule, PathRules, SessionGate};
pub use middleware::session_gate;
pub use redirect::{is_safe_return_target, login_redirect, return_target, LOGIN_PATH};
pub use store::{
    DisabledSessionStore, SessionHandles, SessionReader, SessionRefresher, SessionStore,
};
pub use supabase::SupabaseSessionStore;
pub use types::{AuthIdentity, StoredSession};

/// Build the session handles and gate for a deployment mode
pub fn build_gate(
    mode: AuthMode,
    auth_config: Option<AuthConfig>,
    rules: PathRules,
) -> (SessionGate, SessionHandles) {
    let handles = match (mode, auth_config) {
        (AuthMode::Enforced, Some(config)) => {
            SessionHandles::from_store(std::sync::Arc::new(SupabaseSessionStore::new(config)))
        }
        _ => SessionHandles::from_store(std::sync::Arc::new(DisabledSessionStore)),
    };

    let gate = SessionGate::new(
        mode,
        rules,
        handles.reader.clone(),
        handles.refresher.clone(),
    );
    (gate, handles)
}

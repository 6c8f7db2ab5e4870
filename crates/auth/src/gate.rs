//! Request-time session gate
//!
//! Per request:
//! 1. classify the path against an ordered rule table; excluded paths
//!    bypass the gate entirely
//! 2. on a Protected path (when auth is enforced) verify the user with the
//!    read-only reader; no user, or a reader error, ends the request with a
//!    login redirect
//! 3. every request still standing gets exactly one refresh pass
//!
//! Step 2 always finishes before step 3 starts, so a request can never be
//! session-touched while still unauthenticated for a Protected path.

use std::sync::Arc;

use crate::config::AuthMode;
use crate::cookies::{RequestCookies, SessionRefresh};
use crate::error::AuthError;
use crate::redirect::login_redirect;
use crate::store::{SessionReader, SessionRefresher};
use crate::types::AuthIdentity;

/// Framework asset prefixes that never enter the gate
pub const ASSET_PREFIXES: &[&str] = &["/assets/", "/static/"];

/// Static image extensions that never enter the gate
pub const IMAGE_EXTENSIONS: &[&str] = &[".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Prefix requiring an authenticated user
pub const PROTECTED_PREFIX: &str = "/protected";

/// How the gate treats a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Passed through untouched: no identity check, no refresh
    Excluded,
    /// Requires a verified user
    Protected,
    /// Refresh only
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    Exact(String),
    Prefix(String),
    Suffix(String),
}

impl PathMatcher {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Exact(p) => path == p,
            PathMatcher::Prefix(p) => path.starts_with(p.as_str()),
            PathMatcher::Suffix(s) => path.ends_with(s.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    pub matcher: PathMatcher,
    pub class: PathClass,
}

/// Ordered rule table, evaluated top-down; first match wins, unmatched
/// paths are Public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRules {
    rules: Vec<PathRule>,
}

impl PathRules {
    pub fn new(rules: Vec<PathRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }

    pub fn classify(&self, path: &str) -> PathClass {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(path))
            .map(|rule| rule.class)
            .unwrap_or(PathClass::Public)
    }
}

impl Default for PathRules {
    /// Exclusions first (asset prefixes, favicon, image extensions), then
    /// the protected prefix. Exclusion therefore beats protection:
    /// `/protected/logo.png` is Excluded.
    fn default() -> Self {
        let mut rules = Vec::new();

        for prefix in ASSET_PREFIXES {
            rules.push(PathRule {
                matcher: PathMatcher::Prefix(prefix.to_string()),
                class: PathClass::Excluded,
            });
        }
        rules.push(PathRule {
            matcher: PathMatcher::Exact("/favicon.ico".to_string()),
            class: PathClass::Excluded,
        });
        for ext in IMAGE_EXTENSIONS {
            rules.push(PathRule {
                matcher: PathMatcher::Suffix(ext.to_string()),
                class: PathClass::Excluded,
            });
        }
        rules.push(PathRule {
            matcher: PathMatcher::Prefix(PROTECTED_PREFIX.to_string()),
            class: PathClass::Protected,
        });

        Self::new(rules)
    }
}

/// Outcome of the gate for one request
#[derive(Debug)]
pub enum GateDecision {
    /// Bypass the gate; forward untouched
    Excluded,
    /// Redirect to login; nothing else happens
    Deny { location: String },
    /// Forward with the refresh applied. `identity` is set only when this
    /// request was verified on a Protected path.
    Allow {
        identity: Option<AuthIdentity>,
        refresh: SessionRefresh,
    },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, GateDecision::Deny { .. })
    }
}

/// The session gate. Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct SessionGate {
    mode: AuthMode,
    rules: Arc<PathRules>,
    reader: Arc<dyn SessionReader>,
    refresher: Arc<dyn SessionRefresher>,
}

impl SessionGate {
    pub fn new(
        mode: AuthMode,
        rules: PathRules,
        reader: Arc<dyn SessionReader>,
        refresher: Arc<dyn SessionRefresher>,
    ) -> Self {
        Self {
            mode,
            rules: Arc::new(rules),
            reader,
            refresher,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn classify(&self, path: &str) -> PathClass {
        self.rules.classify(path)
    }

    /// Decide what happens to a request.
    ///
    /// `Err` only comes from the refresh pass and is fatal for the request.
    pub async fn decide(
        &self,
        path: &str,
        cookies: &RequestCookies,
    ) -> Result<GateDecision, AuthError> {
        let class = self.classify(path);
        if class == PathClass::Excluded {
            return Ok(GateDecision::Excluded);
        }

        let identity = match (self.mode, class) {
            (AuthMode::Enforced, PathClass::Protected) => {
                match self.reader.current_user(cookies).await {
                    Ok(Some(user)) => Some(user),
                    Ok(None) => {
                        tracing::debug!(path = %path, "No session for protected path");
                        return Ok(GateDecision::Deny {
                            location: login_redirect(path),
                        });
                    }
                    Err(e) => {
                        // Same redirect as "no user"; the cause stays in the logs
                        tracing::warn!(path = %path, error = %e, "Identity check failed");
                        return Ok(GateDecision::Deny {
                            location: login_redirect(path),
                        });
                    }
                }
            }
            _ => None,
        };

        let refresh = self.refresher.refresh(cookies).await.map_err(|e| match e {
            AuthError::SessionRefreshFailed(_) => e,
            other => AuthError::SessionRefreshFailed(other.to_string()),
        })?;

        Ok(GateDecision::Allow { identity, refresh })
    }
}

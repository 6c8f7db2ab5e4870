//! Authentication configuration and deployment mode

use folio_common::Config;

/// Connection details for the Supabase Auth API
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub supabase_url: String,
    pub anon_key: String,
    pub cookie_secure: bool,
}

impl AuthConfig {
    /// Supabase project ref: the first DNS label of the project URL.
    ///
    /// `https://abcdefgh.supabase.co` -> `abcdefgh`. Self-hosted URLs
    /// such as `http://localhost:54321` yield `localhost`.
    pub fn project_ref(&self) -> &str {
        let without_scheme = self
            .supabase_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.supabase_url);

        without_scheme
            .split(['.', ':', '/'])
            .next()
            .filter(|label| !label.is_empty())
            .unwrap_or("local")
    }

    /// Name of the session cookie (before chunking)
    pub fn cookie_name(&self) -> String {
        format!("sb-{}-auth-token", self.project_ref())
    }
}

/// How the session gate treats identity.
///
/// Selected once at process start and passed to the gate as configuration.
/// `Disabled` is the fail-open mode for deployments without identity
/// provider credentials: no identity checks run and Protected paths are
/// served to anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Enforced,
    Disabled,
}

impl AuthMode {
    /// Pick the mode (and provider config) from application configuration
    pub fn from_config(config: &Config) -> (Self, Option<AuthConfig>) {
        match config.supabase_credentials() {
            Some((url, key)) => (
                AuthMode::Enforced,
                Some(AuthConfig {
                    supabase_url: url.to_string(),
                    anon_key: key.to_string(),
                    cookie_secure: config.session_cookie_secure,
                }),
            ),
            None => {
                tracing::warn!(
                    "SUPABASE_URL / SUPABASE_ANON_KEY not set: session gate is DISABLED and protected routes are open"
                );
                (AuthMode::Disabled, None)
            }
        }
    }
}

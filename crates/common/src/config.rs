//! Configuration management following 12-factor app principles
//!
//! Everything is read from environment variables (with `.env` support for
//! local development). Identity-provider credentials are optional: when
//! either is missing the session gate runs in its disabled mode, which the
//! auth crate decides once at startup from [`Config::supabase_credentials`].

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (Supabase PostgreSQL)
    pub database_url: String,

    /// Supabase Auth endpoint and public key
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,

    /// Mark session cookies `Secure`; only disabled for plain-http local dev
    pub session_cookie_secure: bool,

    pub analytics: AnalyticsSettings,

    /// Comma-separated CORS origins; unset means same-origin only
    pub cors_allowed_origins: Option<String>,

    pub port: u16,
}

/// Third-party analytics provider settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// `plausible` or `mock`
    pub provider: String,
    pub base_url: Option<String>,
    pub site_id: Option<String>,
    pub api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            database_url: var("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required"))?,

            supabase_url: var("SUPABASE_URL").map(|u| u.trim_end_matches('/').to_string()),
            supabase_anon_key: var("SUPABASE_ANON_KEY"),
            session_cookie_secure: var("SESSION_COOKIE_SECURE")
                .map(|v| v.parse().unwrap_or(true))
                .unwrap_or(true),

            analytics: AnalyticsSettings {
                provider: var("ANALYTICS_PROVIDER").unwrap_or_else(|| "mock".to_string()),
                base_url: var("ANALYTICS_BASE_URL"),
                site_id: var("ANALYTICS_SITE_ID"),
                api_key: var("ANALYTICS_API_KEY"),
            },

            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS"),

            port: var("PORT")
                .map(|p| p.parse())
                .transpose()
                .map_err(|e| anyhow::anyhow!("PORT must be a port number: {}", e))?
                .unwrap_or(3000),
        };

        Ok(config)
    }

    /// Supabase URL and anon key, only when both are configured
    pub fn supabase_credentials(&self) -> Option<(&str, &str)> {
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }
}

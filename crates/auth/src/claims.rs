//! Access token claims

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

/// The one access token claim the gate reads: its expiry
#[derive(Debug, Deserialize)]
pub struct AccessTokenClaims {
    pub exp: u64,
}

impl AccessTokenClaims {
    /// Read the payload segment without verifying the signature.
    ///
    /// Only ever used to schedule a refresh. Identity is always confirmed
    /// by the provider, never by these claims.
    pub(crate) fn peek(token: &str) -> Option<Self> {
        let payload = token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

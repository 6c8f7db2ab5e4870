//! Session cookies
//!
//! Three pieces:
//! - [`RequestCookies`]: read-only snapshot of the incoming `Cookie` headers
//! - [`SessionRefresh`]: cookie mutations produced by a refresh, applied to
//!   the forwarded request and to the outgoing response
//! - [`SessionCookieCodec`]: the Supabase SSR cookie format
//!   (`sb-<ref>-auth-token`, `base64-` prefixed JSON, chunked past 3180 bytes)

use axum::http::{header, HeaderMap, HeaderValue};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use time::Duration;

use crate::error::AuthError;
use crate::types::StoredSession;

/// Largest value written into a single cookie before chunking
pub const MAX_CHUNK_SIZE: usize = 3180;

const BASE64_PREFIX: &str = "base64-";

/// 400 days, the browser cap for cookie lifetimes
const COOKIE_MAX_AGE_SECS: i64 = 400 * 24 * 60 * 60;

/// Read-only view of the request's cookies.
///
/// There is deliberately no way to write through this type.
#[derive(Debug, Clone, Default)]
pub struct RequestCookies {
    jar: CookieJar,
}

impl RequestCookies {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            jar: CookieJar::from_headers(headers),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.jar.get(name).map(|c| c.value())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.jar.iter().map(|c| c.name())
    }
}

/// Cookie mutations returned by the session refresher.
///
/// A cookie with `Max-Age=0` is a removal.
#[derive(Debug, Clone, Default)]
pub struct SessionRefresh {
    cookies: Vec<Cookie<'static>>,
}

impl SessionRefresh {
    /// No cookie changes
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn with_cookies(cookies: Vec<Cookie<'static>>) -> Self {
        Self { cookies }
    }

    pub fn cookies(&self) -> &[Cookie<'static>] {
        &self.cookies
    }

    pub fn is_unchanged(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn is_removal(cookie: &Cookie<'_>) -> bool {
        cookie.max_age() == Some(Duration::ZERO)
    }

    /// Rewrite the request's `Cookie` header so downstream handlers see
    /// the refreshed session instead of the stale one.
    pub fn apply_to_request(&self, headers: &mut HeaderMap) {
        if self.cookies.is_empty() {
            return;
        }

        let mut pairs: Vec<(String, String)> = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|raw| {
                Cookie::split_parse(raw)
                    .filter_map(Result::ok)
                    .map(|c| (c.name().to_string(), c.value().to_string()))
                    .collect::<Vec<_>>()
            })
            .collect();

        for cookie in &self.cookies {
            pairs.retain(|(name, _)| name != cookie.name());
            if !Self::is_removal(cookie) {
                pairs.push((cookie.name().to_string(), cookie.value().to_string()));
            }
        }

        headers.remove(header::COOKIE);
        if pairs.is_empty() {
            return;
        }

        let joined = pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");

        match HeaderValue::from_str(&joined) {
            Ok(value) => {
                headers.insert(header::COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Refreshed cookie header is not a valid header value"),
        }
    }

    /// Append one `Set-Cookie` per mutation.
    ///
    /// Cookies the handler already set win: a login response that writes a
    /// fresh session must not be followed by this pass clearing it.
    pub fn apply_to_response(&self, headers: &mut HeaderMap) {
        let handler_set: Vec<String> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|raw| Cookie::parse(raw).ok())
            .map(|c| c.name().to_string())
            .collect();

        for cookie in &self.cookies {
            if handler_set.iter().any(|name| name == cookie.name()) {
                continue;
            }
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(value) => {
                    headers.append(header::SET_COOKIE, value);
                }
                Err(e) => {
                    tracing::warn!(error = %e, cookie = %cookie.name(), "Dropping unencodable Set-Cookie")
                }
            }
        }
    }
}

/// What the session cookie(s) on a request contain
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCookieState {
    Absent,
    /// Present but not decodable as a session
    Invalid,
    Present(StoredSession),
}

/// Reads and writes the Supabase SSR session cookie format
#[derive(Debug, Clone)]
pub struct SessionCookieCodec {
    name: String,
    secure: bool,
}

impl SessionCookieCodec {
    pub fn new(name: impl Into<String>, secure: bool) -> Self {
        Self {
            name: name.into(),
            secure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn chunk_name(&self, index: usize) -> String {
        format!("{}.{}", self.name, index)
    }

    /// Chunk cookies present on the request, as `(index, name)`
    fn present_chunks(&self, cookies: &RequestCookies) -> Vec<(usize, String)> {
        let prefix = format!("{}.", self.name);
        let mut chunks: Vec<(usize, String)> = cookies
            .names()
            .filter_map(|name| {
                let index = name.strip_prefix(&prefix)?.parse::<usize>().ok()?;
                Some((index, name.to_string()))
            })
            .collect();
        chunks.sort_by_key(|(index, _)| *index);
        chunks
    }

    /// Whole (possibly reassembled) cookie value
    fn combined_value(&self, cookies: &RequestCookies) -> Option<String> {
        if let Some(value) = cookies.get(&self.name) {
            return Some(value.to_string());
        }

        let mut value = String::new();
        for index in 0.. {
            match cookies.get(&self.chunk_name(index)) {
                Some(chunk) => value.push_str(chunk),
                None => break,
            }
        }

        (!value.is_empty()).then_some(value)
    }

    pub fn read(&self, cookies: &RequestCookies) -> SessionCookieState {
        match self.combined_value(cookies) {
            None => SessionCookieState::Absent,
            Some(raw) => match decode_session(&raw) {
                Some(session) => SessionCookieState::Present(session),
                None => SessionCookieState::Invalid,
            },
        }
    }

    /// Cookies that store `session`, replacing whatever layout the request had
    pub fn write(
        &self,
        session: &StoredSession,
        existing: &RequestCookies,
    ) -> Result<Vec<Cookie<'static>>, AuthError> {
        let encoded = encode_session(session)?;
        let stale_chunks = self.present_chunks(existing);
        let mut cookies = Vec::new();

        if encoded.len() <= MAX_CHUNK_SIZE {
            cookies.push(self.build(self.name.clone(), encoded));
            for (_, name) in stale_chunks {
                cookies.push(self.removal(name));
            }
            return Ok(cookies);
        }

        let chunks: Vec<String> = encoded
            .as_bytes()
            .chunks(MAX_CHUNK_SIZE)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect();
        let count = chunks.len();

        for (index, chunk) in chunks.into_iter().enumerate() {
            cookies.push(self.build(self.chunk_name(index), chunk));
        }
        if existing.get(&self.name).is_some() {
            cookies.push(self.removal(self.name.clone()));
        }
        for (index, name) in stale_chunks {
            if index >= count {
                cookies.push(self.removal(name));
            }
        }

        Ok(cookies)
    }

    /// Removals for every session cookie on the request
    pub fn clear(&self, existing: &RequestCookies) -> Vec<Cookie<'static>> {
        let mut cookies = Vec::new();
        if existing.get(&self.name).is_some() {
            cookies.push(self.removal(self.name.clone()));
        }
        for (_, name) in self.present_chunks(existing) {
            cookies.push(self.removal(name));
        }
        cookies
    }

    fn build(&self, name: String, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(Duration::seconds(COOKIE_MAX_AGE_SECS))
            .build()
    }

    fn removal(&self, name: String) -> Cookie<'static> {
        Cookie::build((name, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(Duration::ZERO)
            .build()
    }
}

fn encode_session(session: &StoredSession) -> Result<String, AuthError> {
    let json = serde_json::to_vec(session)
        .map_err(|e| AuthError::SessionRefreshFailed(format!("encode session: {}", e)))?;
    Ok(format!("{}{}", BASE64_PREFIX, URL_SAFE_NO_PAD.encode(json)))
}

/// Accepts `base64-<base64url json>` and bare JSON values
fn decode_session(raw: &str) -> Option<StoredSession> {
    match raw.strip_prefix(BASE64_PREFIX) {
        Some(encoded) => {
            let bytes = URL_SAFE_NO_PAD.decode(encoded.trim_end_matches('=')).ok()?;
            serde_json::from_slice(&bytes).ok()
        }
        None => serde_json::from_str(raw).ok(),
    }
}

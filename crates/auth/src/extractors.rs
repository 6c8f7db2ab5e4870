//! Axum extractors for the gate-verified user
//!
//! The gate inserts the identity into request extensions after a
//! successful check on a Protected path. These extractors only read it;
//! they never call the identity provider again.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;

use crate::error::AuthError;
use crate::types::AuthIdentity;

/// User verified by the session gate for this request.
///
/// Rejects with 401 on routes the gate did not verify (Public paths, or
/// any path while auth is disabled).
#[derive(Debug, Clone)]
pub struct SessionUser(pub AuthIdentity);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthIdentity>()
            .cloned()
            .map(SessionUser)
            .ok_or(AuthError::Unauthenticated)
    }
}

impl<S> OptionalFromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthIdentity>().cloned().map(SessionUser))
    }
}

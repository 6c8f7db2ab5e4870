//! Login, logout and identity endpoints
//!
//! The session cookies themselves are owned by the session store; these
//! handlers only forward its cookie mutations onto the response.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use folio_auth::{return_target, AuthError, AuthMode, RequestCookies, SessionUser, LOGIN_PATH};
use folio_common::ValidatedJson;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::PortfolioState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 1024))]
    pub password: String,

    /// Where to go after signing in; must be a local path
    pub redirect: Option<String>,
}

/// `?redirect=` as set by the session gate
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub redirect: Option<String>,
}

/// Describes the login entry point to clients that land on it
#[derive(Debug, Serialize)]
pub struct LoginDescriptor {
    pub login: &'static str,
    pub redirect: Option<String>,
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub id: Uuid,
    pub email: Option<String>,
}

pub async fn login_page(
    State(mode): State<AuthMode>,
    Query(query): Query<RedirectQuery>,
) -> Json<LoginDescriptor> {
    Json(LoginDescriptor {
        login: LOGIN_PATH,
        redirect: query.redirect,
        enabled: mode == AuthMode::Enforced,
    })
}

/// Sign in with email and password, then 303 to the return target
pub async fn login(
    State(state): State<PortfolioState>,
    Query(query): Query<RedirectQuery>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> std::result::Result<Response, AuthError> {
    let cookies = RequestCookies::from_headers(&headers);
    let (identity, refresh) = state
        .sessions
        .sign_in_with_password(&request.email, &request.password, &cookies)
        .await?;

    let requested = request.redirect.or(query.redirect);
    let target = return_target(requested.as_deref());
    tracing::debug!(user_id = %identity.id, target = %target, "Login succeeded");

    let mut response = Redirect::to(target).into_response();
    refresh.apply_to_response(response.headers_mut());
    Ok(response)
}

/// Sign out and return to the login entry point
pub async fn logout(
    State(state): State<PortfolioState>,
    headers: HeaderMap,
) -> std::result::Result<Response, AuthError> {
    let cookies = RequestCookies::from_headers(&headers);
    let refresh = state.sessions.sign_out(&cookies).await?;

    let mut response = Redirect::to(LOGIN_PATH).into_response();
    refresh.apply_to_response(response.headers_mut());
    Ok(response)
}

/// The identity the session gate verified for this request
pub async fn whoami(SessionUser(identity): SessionUser) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        id: identity.id,
        email: identity.email,
    })
}

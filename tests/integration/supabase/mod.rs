//! Supabase session store against a stub GoTrue server
//!
//! The stub listens on an ephemeral localhost port and understands just
//! enough of `/auth/v1/*` to exercise token validation, rotation, sign-in
//! and sign-out.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use folio_auth::{
    build_gate, AuthConfig, AuthError, AuthMode, PathRules, RequestCookies, SessionCookieState,
    SessionReader, SessionRefresh, SessionRefresher, SessionStore, StoredSession,
    SupabaseSessionStore,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{body_json, get as get_request, lazy_pool, set_cookies};

const ANON_KEY: &str = "anon-test-key";
const USER_EMAIL: &str = "artist@example.com";
const USER_PASSWORD: &str = "correct horse";

#[derive(Clone)]
struct Stub {
    user_id: Uuid,
    user_calls: Arc<AtomicUsize>,
    refresh_calls: Arc<AtomicUsize>,
    logout_calls: Arc<AtomicUsize>,
    /// Non-zero forces `/user` to answer with this status
    user_status: Arc<AtomicU16>,
    /// Refresh tokens already exchanged; GoTrue accepts each one once
    spent_refresh: Arc<Mutex<HashSet<String>>>,
}

impl Stub {
    fn new() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            user_calls: Arc::new(AtomicUsize::new(0)),
            refresh_calls: Arc::new(AtomicUsize::new(0)),
            logout_calls: Arc::new(AtomicUsize::new(0)),
            user_status: Arc::new(AtomicU16::new(0)),
            spent_refresh: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    fn user_json(&self) -> Value {
        json!({ "id": self.user_id, "email": USER_EMAIL, "aud": "authenticated" })
    }

    fn token_response(&self, access: &str, refresh: &str) -> Value {
        json!({
            "access_token": access,
            "refresh_token": refresh,
            "expires_in": 3600,
            "token_type": "bearer",
            "user": self.user_json()
        })
    }
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn has_anon_key(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(ANON_KEY)
}

async fn stub_user(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    stub.user_calls.fetch_add(1, Ordering::SeqCst);

    let forced = stub.user_status.load(Ordering::SeqCst);
    if forced != 0 {
        let status = StatusCode::from_u16(forced).unwrap();
        return (status, Json(json!({ "msg": "forced" }))).into_response();
    }

    if !has_anon_key(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match bearer(&headers) {
        Some("valid-access") | Some("rotated-access") => Json(stub.user_json()).into_response(),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "invalid JWT" }))).into_response(),
    }
}

async fn stub_token(
    State(stub): State<Stub>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    match query.get("grant_type").map(String::as_str) {
        Some("refresh_token") => {
            stub.refresh_calls.fetch_add(1, Ordering::SeqCst);
            let token = body["refresh_token"].as_str().unwrap_or_default().to_string();
            let first_use = stub.spent_refresh.lock().unwrap().insert(token.clone());
            if token == "good-refresh" && first_use {
                Json(stub.token_response("rotated-access", "rotated-refresh")).into_response()
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "invalid_grant" })),
                )
                    .into_response()
            }
        }
        Some("password") => {
            if body["email"] == USER_EMAIL && body["password"] == USER_PASSWORD {
                Json(stub.token_response("valid-access", "good-refresh")).into_response()
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "invalid_grant" })),
                )
                    .into_response()
            }
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn stub_logout(State(stub): State<Stub>, headers: HeaderMap) -> StatusCode {
    stub.logout_calls.fetch_add(1, Ordering::SeqCst);
    match bearer(&headers) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::UNAUTHORIZED,
    }
}

/// Start the stub and return its base URL
async fn start_stub(stub: Stub) -> String {
    let app = Router::new()
        .route("/auth/v1/user", get(stub_user))
        .route("/auth/v1/token", post(stub_token))
        .route("/auth/v1/logout", post(stub_logout))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn auth_config(base_url: &str) -> AuthConfig {
    AuthConfig {
        supabase_url: base_url.to_string(),
        anon_key: ANON_KEY.to_string(),
        cookie_secure: false,
    }
}

async fn store_and_stub() -> (SupabaseSessionStore, Stub, String) {
    let stub = Stub::new();
    let base_url = start_stub(stub.clone()).await;
    let store = SupabaseSessionStore::new(auth_config(&base_url));
    (store, stub, base_url)
}

fn session(access: &str, refresh: &str, expires_in_secs: i64) -> StoredSession {
    StoredSession {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        expires_at: Some(chrono::Utc::now().timestamp() + expires_in_secs),
        expires_in: Some(3600),
        token_type: "bearer".to_string(),
        user: None,
    }
}

/// `Cookie` header value carrying `cookies`
fn cookie_header(cookies: &[Cookie<'static>]) -> String {
    cookies
        .iter()
        .filter(|c| !SessionRefresh::is_removal(c))
        .map(|c| format!("{}={}", c.name(), c.value()))
        .collect::<Vec<_>>()
        .join("; ")
}

fn request_cookies(header_value: &str) -> RequestCookies {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(header_value).unwrap());
    RequestCookies::from_headers(&headers)
}

/// Request cookies holding `session` in the store's cookie format
fn session_cookies(store: &SupabaseSessionStore, session: &StoredSession) -> RequestCookies {
    let written = store
        .codec()
        .write(session, &RequestCookies::default())
        .unwrap();
    request_cookies(&cookie_header(&written))
}

mod test_reader {
    use super::*;

    #[tokio::test]
    async fn test_valid_session_is_verified_live() {
        let (store, stub, _) = store_and_stub().await;
        let cookies = session_cookies(&store, &session("valid-access", "good-refresh", 3600));

        let user = store.current_user(&cookies).await.unwrap().unwrap();
        assert_eq!(user.id, stub.user_id);
        assert_eq!(user.email.as_deref(), Some(USER_EMAIL));

        // Never cached
        store.current_user(&cookies).await.unwrap();
        assert_eq!(stub.user_calls.load(Ordering::SeqCst), 2);
        assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expired_session_is_exchanged_in_memory() {
        let (store, stub, _) = store_and_stub().await;
        let cookies = session_cookies(&store, &session("stale-access", "good-refresh", -10));

        let user = store.current_user(&cookies).await.unwrap();
        assert!(user.is_some());
        assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.user_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_session_inside_refresh_margin_is_not_exchanged() {
        let (store, stub, _) = store_and_stub().await;
        let cookies = session_cookies(&store, &session("valid-access", "good-refresh", 60));

        let user = store.current_user(&cookies).await.unwrap();
        assert_eq!(user.map(|u| u.id), Some(stub.user_id));
        assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 0);
        assert_eq!(stub.user_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejected_or_missing_session_is_no_user() {
        let (store, _, _) = store_and_stub().await;

        let revoked = session_cookies(&store, &session("revoked-access", "good-refresh", 3600));
        assert!(store.current_user(&revoked).await.unwrap().is_none());

        let dead_refresh = session_cookies(&store, &session("stale-access", "dead-refresh", -10));
        assert!(store.current_user(&dead_refresh).await.unwrap().is_none());

        assert!(store
            .current_user(&RequestCookies::default())
            .await
            .unwrap()
            .is_none());

        let garbage = request_cookies(&format!("{}=base64-%%%", store.codec().name()));
        assert!(store.current_user(&garbage).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_provider_failure_is_an_error() {
        let (store, stub, _) = store_and_stub().await;
        stub.user_status.store(500, Ordering::SeqCst);
        let cookies = session_cookies(&store, &session("valid-access", "good-refresh", 3600));

        let result = store.current_user(&cookies).await;
        assert!(matches!(result, Err(AuthError::Provider(_))));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error() {
        let store = SupabaseSessionStore::new(auth_config("http://127.0.0.1:1"));
        let cookies = session_cookies(&store, &session("valid-access", "good-refresh", 3600));

        let result = store.current_user(&cookies).await;
        assert!(matches!(result, Err(AuthError::Provider(_))));
    }
}

mod test_refresher {
    use super::*;

    #[tokio::test]
    async fn test_valid_session_is_left_alone() {
        let (store, _, _) = store_and_stub().await;
        let cookies = session_cookies(&store, &session("valid-access", "good-refresh", 3600));

        let refresh = store.refresh(&cookies).await.unwrap();
        assert!(refresh.is_unchanged());
    }

    #[tokio::test]
    async fn test_expiring_session_is_rotated_into_cookies() {
        let (store, stub, _) = store_and_stub().await;
        let cookies = session_cookies(&store, &session("stale-access", "good-refresh", 30));

        let refresh = store.refresh(&cookies).await.unwrap();
        assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1);
        assert!(!refresh.is_unchanged());

        let rotated = request_cookies(&cookie_header(refresh.cookies()));
        match store.codec().read(&rotated) {
            SessionCookieState::Present(session) => {
                assert_eq!(session.access_token, "rotated-access");
                assert_eq!(session.refresh_token, "rotated-refresh");
                assert!(session.expires_at.is_some());
            }
            other => panic!("expected rotated session, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spent_refresh_token_clears_cookies() {
        let (store, _, _) = store_and_stub().await;
        let cookies = session_cookies(&store, &session("stale-access", "good-refresh", 30));

        assert!(!store.refresh(&cookies).await.unwrap().is_unchanged());

        let replayed = store.refresh(&cookies).await.unwrap();
        assert_eq!(replayed.cookies().len(), 1);
        assert!(SessionRefresh::is_removal(&replayed.cookies()[0]));
    }

    #[tokio::test]
    async fn test_rejected_refresh_token_clears_cookies() {
        let (store, _, _) = store_and_stub().await;
        let cookies = session_cookies(&store, &session("stale-access", "dead-refresh", -10));

        let refresh = store.refresh(&cookies).await.unwrap();
        assert_eq!(refresh.cookies().len(), 1);
        assert!(SessionRefresh::is_removal(&refresh.cookies()[0]));
    }

    #[tokio::test]
    async fn test_revoked_access_token_clears_cookies() {
        let (store, _, _) = store_and_stub().await;
        let cookies = session_cookies(&store, &session("revoked-access", "good-refresh", 3600));

        let refresh = store.refresh(&cookies).await.unwrap();
        assert!(refresh
            .cookies()
            .iter()
            .all(|c| SessionRefresh::is_removal(c)));
        assert!(!refresh.is_unchanged());
    }

    #[tokio::test]
    async fn test_undecodable_cookie_is_cleared() {
        let (store, stub, _) = store_and_stub().await;
        let cookies = request_cookies(&format!("{}=garbage", store.codec().name()));

        let refresh = store.refresh(&cookies).await.unwrap();
        assert_eq!(refresh.cookies().len(), 1);
        assert!(SessionRefresh::is_removal(&refresh.cookies()[0]));
        assert_eq!(stub.user_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_a_refresh_failure() {
        let (store, stub, _) = store_and_stub().await;
        stub.user_status.store(503, Ordering::SeqCst);
        let cookies = session_cookies(&store, &session("valid-access", "good-refresh", 3600));

        let result = store.refresh(&cookies).await;
        assert!(matches!(result, Err(AuthError::SessionRefreshFailed(_))));
    }
}

mod test_sign_in_and_out {
    use super::*;

    #[tokio::test]
    async fn test_password_sign_in_writes_session_cookie() {
        let (store, stub, _) = store_and_stub().await;

        let (identity, refresh) = store
            .sign_in_with_password(USER_EMAIL, USER_PASSWORD, &RequestCookies::default())
            .await
            .unwrap();

        assert_eq!(identity.id, stub.user_id);
        let cookies = request_cookies(&cookie_header(refresh.cookies()));
        match store.codec().read(&cookies) {
            SessionCookieState::Present(session) => {
                assert_eq!(session.access_token, "valid-access")
            }
            other => panic!("expected session, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let (store, _, _) = store_and_stub().await;

        let result = store
            .sign_in_with_password(USER_EMAIL, "wrong", &RequestCookies::default())
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_sign_out_revokes_and_clears() {
        let (store, stub, _) = store_and_stub().await;
        let cookies = session_cookies(&store, &session("valid-access", "good-refresh", 3600));

        let refresh = store.sign_out(&cookies).await.unwrap();

        assert_eq!(stub.logout_calls.load(Ordering::SeqCst), 1);
        assert_eq!(refresh.cookies().len(), 1);
        assert!(SessionRefresh::is_removal(&refresh.cookies()[0]));
    }
}

mod test_gate_with_supabase {
    use super::*;
    use crate::common::router_with;

    async fn router() -> (axum::Router, SupabaseSessionStore, Stub) {
        let (store, stub, base_url) = store_and_stub().await;
        let (_, handles) = build_gate(
            AuthMode::Enforced,
            Some(auth_config(&base_url)),
            PathRules::default(),
        );
        (
            router_with(AuthMode::Enforced, handles, lazy_pool()),
            store,
            stub,
        )
    }

    #[tokio::test]
    async fn test_protected_route_with_supabase_session() {
        let (router, store, stub) = router().await;
        let written = store
            .codec()
            .write(
                &session("valid-access", "good-refresh", 3600),
                &RequestCookies::default(),
            )
            .unwrap();

        let response = router
            .oneshot(get_request(
                "/protected/api/whoami",
                Some(&cookie_header(&written)),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookies(&response).is_empty());
        // One identity check, one refresh validation
        assert_eq!(stub.user_calls.load(Ordering::SeqCst), 2);
        assert_eq!(body_json(response).await["id"], stub.user_id.to_string());
    }

    #[tokio::test]
    async fn test_expiring_supabase_session_is_rotated_by_gate() {
        let (router, store, stub) = router().await;
        let written = store
            .codec()
            .write(
                &session("valid-access", "good-refresh", 60),
                &RequestCookies::default(),
            )
            .unwrap();

        let response = router
            .oneshot(get_request(
                "/protected/api/whoami",
                Some(&cookie_header(&written)),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with(store.codec().name()));
        assert!(cookies[0].contains("HttpOnly"));
        assert!(cookies[0].contains("SameSite=Lax"));
        assert!(!cookies[0].contains("Max-Age=0"));

        // The identity check verified the token as is; the refresh pass made
        // the only exchange of the single-use refresh token
        assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.user_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_supabase_session_redirects() {
        let (router, _, stub) = router().await;

        let response = router
            .oneshot(get_request("/protected/dashboard", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(stub.user_calls.load(Ordering::SeqCst), 0);
    }
}

//! Login, logout and the login entry point

use std::sync::Arc;

use axum::http::StatusCode;
use folio_auth::mock::{MockCall, MockSessionStore};
use folio_auth::{AuthMode, DisabledSessionStore, SessionHandles};
use serde_json::json;
use tower::ServiceExt;

use crate::common::{
    body_json, json_request, lazy_pool, location, router_with, set_cookies, TestApp,
};

fn app_with_account() -> TestApp {
    let user = MockSessionStore::identity("artist@example.com");
    TestApp::enforced(MockSessionStore::new().with_credentials(
        "artist@example.com",
        "correct horse",
        user,
    ))
}

fn session_cookie(set_cookie: &[String]) -> String {
    set_cookie
        .iter()
        .find(|c| c.starts_with("mock-session=") && !c.contains("Max-Age=0"))
        .and_then(|c| c.split(';').next())
        .expect("login sets a session cookie")
        .to_string()
}

#[tokio::test]
async fn test_login_sets_session_and_redirects_to_requested_path() {
    let app = app_with_account();

    let response = app
        .send(json_request(
            "POST",
            "/auth/login",
            None,
            json!({
                "email": "artist@example.com",
                "password": "correct horse",
                "redirect": "/protected/api/whoami"
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/protected/api/whoami"));
    assert_eq!(app.store.calls(), vec![MockCall::Refresh, MockCall::SignIn]);

    // The new session opens protected routes
    let cookie = session_cookie(&set_cookies(&response));
    let response = app.get("/protected/api/whoami", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], "artist@example.com");
}

#[tokio::test]
async fn test_login_uses_redirect_from_query_string() {
    let app = app_with_account();

    let response = app
        .send(json_request(
            "POST",
            "/auth/login?redirect=%2Fprotected%2Fapi%2Fpages",
            None,
            json!({ "email": "artist@example.com", "password": "correct horse" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/protected/api/pages"));
}

#[tokio::test]
async fn test_login_ignores_offsite_redirect() {
    let app = app_with_account();

    for target in ["//evil.example", "https://evil.example", "/\\evil.example"] {
        let response = app
            .send(json_request(
                "POST",
                "/auth/login",
                None,
                json!({
                    "email": "artist@example.com",
                    "password": "correct horse",
                    "redirect": target
                }),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/protected"), "{}", target);
    }
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = app_with_account();

    let response = app
        .send(json_request(
            "POST",
            "/auth/login",
            None,
            json!({ "email": "artist@example.com", "password": "wrong" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_rejects_malformed_body() {
    let app = app_with_account();

    let response = app
        .send(json_request(
            "POST",
            "/auth/login",
            None,
            json!({ "email": "not-an-email", "password": "x" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.store.count(MockCall::SignIn), 0);
}

#[tokio::test]
async fn test_login_over_stale_cookie_keeps_new_session() {
    let app = app_with_account();

    let response = app
        .send(json_request(
            "POST",
            "/auth/login",
            Some("mock-session=stale"),
            json!({ "email": "artist@example.com", "password": "correct horse" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1, "{:?}", cookies);
    assert!(!cookies[0].contains("Max-Age=0"));
}

#[tokio::test]
async fn test_login_when_auth_is_disabled() {
    let router = router_with(
        AuthMode::Disabled,
        SessionHandles::from_store(Arc::new(DisabledSessionStore)),
        lazy_pool(),
    );

    let response = router
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            json!({ "email": "artist@example.com", "password": "correct horse" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AUTH_DISABLED");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let user = MockSessionStore::identity("artist@example.com");
    let app = TestApp::enforced(MockSessionStore::new().with_session("t1", user));

    let response = app
        .send(json_request("POST", "/auth/logout", Some("mock-session=t1"), json!({})))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].contains("Max-Age=0"));
    assert_eq!(app.store.calls(), vec![MockCall::Refresh, MockCall::SignOut]);

    let response = app
        .get("/protected/api/whoami", Some("mock-session=t1"))
        .await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_login_entry_point_describes_itself() {
    let app = TestApp::enforced(MockSessionStore::new());

    let response = app
        .get("/auth/login?redirect=%2Fprotected%2Fdashboard", None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["login"], "/auth/login");
    assert_eq!(body["redirect"], "/protected/dashboard");
    assert_eq!(body["enabled"], true);
}

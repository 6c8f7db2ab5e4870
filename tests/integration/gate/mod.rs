//! Gate behaviour through the full router

use axum::http::StatusCode;
use folio_auth::mock::{MockCall, MockSessionStore};

use crate::common::{body_json, body_text, location, set_cookies, TestApp};

fn app_with_session(token: &str) -> (TestApp, folio_auth::AuthIdentity) {
    let user = MockSessionStore::identity("artist@example.com");
    let app = TestApp::enforced(MockSessionStore::new().with_session(token, user.clone()));
    (app, user)
}

mod test_protected_paths {
    use super::*;

    #[tokio::test]
    async fn test_no_session_redirects_to_login_without_refresh() {
        let app = TestApp::enforced(MockSessionStore::new());

        let response = app.get("/protected/dashboard", None).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            location(&response),
            Some("/auth/login?redirect=%2Fprotected%2Fdashboard")
        );
        assert!(set_cookies(&response).is_empty());
        assert_eq!(app.store.calls(), vec![MockCall::CurrentUser]);
    }

    #[tokio::test]
    async fn test_unknown_session_redirects_without_refresh() {
        let app = TestApp::enforced(MockSessionStore::new());

        let response = app
            .get("/protected/api/whoami", Some("mock-session=forged"))
            .await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(app.store.count(MockCall::Refresh), 0);
        assert!(set_cookies(&response).is_empty());
    }

    #[tokio::test]
    async fn test_valid_session_checks_identity_then_refreshes_once() {
        let (app, user) = app_with_session("t1");

        let response = app
            .get("/protected/api/whoami", Some("mock-session=t1"))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            app.store.calls(),
            vec![MockCall::CurrentUser, MockCall::Refresh]
        );

        let body = body_json(response).await;
        assert_eq!(body["id"], user.id.to_string());
        assert_eq!(body["email"], "artist@example.com");
    }

    #[tokio::test]
    async fn test_valid_session_keeps_downstream_status() {
        let (app, _) = app_with_session("t1");

        let response = app
            .get("/protected/no-such-page", Some("mock-session=t1"))
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            app.store.calls(),
            vec![MockCall::CurrentUser, MockCall::Refresh]
        );
    }

    #[tokio::test]
    async fn test_expired_session_is_rotated_on_protected_path() {
        let user = MockSessionStore::identity("artist@example.com");
        let app = TestApp::enforced(MockSessionStore::new().with_expired_session("old", user));

        let response = app
            .get("/protected/api/whoami", Some("mock-session=old"))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("mock-session=old-rotated"));

        // The rotated token is a valid session on its own
        let response = app
            .get("/protected/api/whoami", Some("mock-session=old-rotated"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_provider_error_redirects_like_missing_session() {
        let (app, _) = app_with_session("t1");
        app.store.set_provider_down(true);

        let response = app
            .get("/protected/api/whoami", Some("mock-session=t1"))
            .await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            location(&response),
            Some("/auth/login?redirect=%2Fprotected%2Fapi%2Fwhoami")
        );
        assert_eq!(app.store.count(MockCall::Refresh), 0);
    }

    #[tokio::test]
    async fn test_protected_prefix_is_a_raw_prefix() {
        let app = TestApp::enforced(MockSessionStore::new());

        let response = app.get("/protected-archive", None).await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            location(&response),
            Some("/auth/login?redirect=%2Fprotected-archive")
        );
    }

    #[tokio::test]
    async fn test_same_request_twice_gets_same_outcome() {
        let (app, _) = app_with_session("t1");

        let denied_first = app.get("/protected/dashboard", None).await;
        let denied_second = app.get("/protected/dashboard", None).await;
        assert_eq!(denied_first.status(), denied_second.status());
        assert_eq!(location(&denied_first), location(&denied_second));

        let allowed_first = app
            .get("/protected/api/whoami", Some("mock-session=t1"))
            .await;
        let allowed_second = app
            .get("/protected/api/whoami", Some("mock-session=t1"))
            .await;
        assert_eq!(allowed_first.status(), StatusCode::OK);
        assert_eq!(allowed_second.status(), StatusCode::OK);

        // Nothing is cached: every request asks the store again
        assert_eq!(app.store.count(MockCall::CurrentUser), 4);
        assert_eq!(app.store.count(MockCall::Refresh), 2);
    }
}

mod test_public_paths {
    use super::*;

    #[tokio::test]
    async fn test_public_path_refreshes_without_identity_check() {
        let app = TestApp::enforced(MockSessionStore::new());

        let response = app.get("/health", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
        assert_eq!(app.store.calls(), vec![MockCall::Refresh]);
    }

    #[tokio::test]
    async fn test_root_with_expired_session_is_rotated_not_redirected() {
        let user = MockSessionStore::identity("artist@example.com");
        let app = TestApp::enforced(MockSessionStore::new().with_expired_session("old", user));

        let response = app.get("/", Some("mock-session=old")).await;

        assert_ne!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert!(location(&response).is_none());
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("mock-session=old-rotated"));
        assert_eq!(app.store.calls(), vec![MockCall::Refresh]);
    }

    #[tokio::test]
    async fn test_public_path_with_unknown_session_clears_cookie() {
        let app = TestApp::enforced(MockSessionStore::new());

        let response = app.get("/health", Some("mock-session=gone")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("mock-session=;"));
        assert!(cookies[0].contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_session_user_on_public_route_is_unauthorized() {
        // whoami is only meaningful behind the gate; reaching it unverified
        // (here: auth disabled) yields 401 rather than a guessed identity
        let app = TestApp::disabled(MockSessionStore::new());

        let response = app.get("/protected/api/whoami", None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
    }
}

mod test_excluded_paths {
    use super::*;

    #[tokio::test]
    async fn test_favicon_passes_through_without_store_calls() {
        let app = TestApp::enforced(MockSessionStore::new());

        let response = app.get("/favicon.ico", Some("mock-session=gone")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(set_cookies(&response).is_empty());
        assert!(app.store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_assets_and_images_bypass_the_gate() {
        let app = TestApp::enforced(MockSessionStore::new());

        for path in [
            "/assets/app.js",
            "/static/fonts/inter.woff2",
            "/images/dusk.webp",
            "/protected/logo.png",
        ] {
            let response = app.get(path, None).await;
            assert_ne!(
                response.status(),
                StatusCode::TEMPORARY_REDIRECT,
                "{} should not be redirected",
                path
            );
        }

        assert!(app.store.calls().is_empty());
    }
}

mod test_disabled_mode {
    use super::*;

    #[tokio::test]
    async fn test_disabled_mode_never_checks_identity() {
        let app = TestApp::disabled(MockSessionStore::new());

        let response = app.get("/protected/dashboard", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.get("/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(
            app.store.calls(),
            vec![MockCall::Refresh, MockCall::Refresh]
        );
    }

    #[tokio::test]
    async fn test_disabled_mode_still_rotates_sessions() {
        let user = MockSessionStore::identity("artist@example.com");
        let app = TestApp::disabled(MockSessionStore::new().with_expired_session("old", user));

        let response = app.get("/protected/dashboard", Some("mock-session=old")).await;

        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("mock-session=old-rotated"));
        assert_eq!(app.store.count(MockCall::CurrentUser), 0);
    }
}

mod test_refresh_failure {
    use super::*;

    #[tokio::test]
    async fn test_refresh_failure_is_fatal_on_public_path() {
        let app = TestApp::enforced(MockSessionStore::new());
        app.store.set_refresh_broken(true);

        let response = app.get("/health", None).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "SESSION_REFRESH_FAILED");
    }

    #[tokio::test]
    async fn test_refresh_failure_after_successful_identity_check() {
        let (app, _) = app_with_session("t1");
        app.store.set_refresh_broken(true);

        let response = app
            .get("/protected/api/whoami", Some("mock-session=t1"))
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            app.store.calls(),
            vec![MockCall::CurrentUser, MockCall::Refresh]
        );
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "SESSION_REFRESH_FAILED");
        assert!(body.get("id").is_none());
    }
}

//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No verified identity on the request
    #[error("authentication required")]
    Unauthenticated,

    /// Provider rejected the email/password pair
    #[error("invalid login credentials")]
    InvalidCredentials,

    /// Provider unreachable or answered with an unexpected status
    #[error("identity provider error: {0}")]
    Provider(String),

    /// Session refresh failed; fatal for the request
    #[error("session refresh failed: {0}")]
    SessionRefreshFailed(String),

    /// No identity provider configured
    #[error("authentication is not configured")]
    AuthDisabled,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "Authentication required",
            ),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password",
            ),
            AuthError::Provider(_) => (
                StatusCode::BAD_GATEWAY,
                "AUTH_PROVIDER_ERROR",
                "Authentication provider unavailable",
            ),
            AuthError::SessionRefreshFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SESSION_REFRESH_FAILED",
                "Failed to refresh session",
            ),
            AuthError::AuthDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AUTH_DISABLED",
                "Authentication is not configured",
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Authentication failure");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

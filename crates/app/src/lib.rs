//! Folio application composition root
//!
//! Wires configuration, the session gate, analytics and the portfolio
//! routes into a single router. The gate wraps the whole router,
//! fallback included, so it sees every request before any handler does.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    Router,
};
use folio_analytics::AnalyticsServiceFactory;
use folio_auth::{build_gate, session_gate, AuthMode, PathRules, SessionGate};
use folio_common::{Config, Error};
use folio_portfolio::{PortfolioRepositories, PortfolioState};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

/// Largest accepted request body (1 MiB); content is JSON, images live on a CDN
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router from configuration
pub fn create_app(config: &Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let (auth_mode, auth_config) = AuthMode::from_config(config);
    let (gate, handles) = build_gate(auth_mode, auth_config, PathRules::default());

    let analytics = AnalyticsServiceFactory::create(&config.analytics)?;

    tracing::info!(
        auth_mode = ?auth_mode,
        analytics_provider = analytics.provider(),
        "Application composed"
    );

    let state = PortfolioState {
        repos: PortfolioRepositories::new(pool),
        sessions: handles.store,
        analytics: Arc::from(analytics),
        auth_mode,
    };

    Ok(build_router(state, gate))
}

/// Compose routes and install the session gate in front of them
pub fn build_router(state: PortfolioState, gate: SessionGate) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(folio_portfolio::routes().with_state(state))
        .fallback(not_found)
        .layer(from_fn_with_state(gate, session_gate))
}

/// CORS for the configured origins. Credentials are allowed because the
/// session travels in cookies, which rules out a wildcard origin.
pub fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn body_limit_layer() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_BODY_BYTES)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found() -> Response {
    Error::NotFound("Route not found".to_string()).into_response()
}

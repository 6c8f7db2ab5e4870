//! Route definitions for the portfolio API
//!
//! Public reads live under `/api`; dashboard routes live under
//! `/protected/api`, which the session gate guards before routing.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{analytics, artworks, auth, collections, exhibitions, pages, performances};
use super::middleware::PortfolioState;

/// Published content, readable by anyone
fn public_routes() -> Router<PortfolioState> {
    Router::new()
        .route("/api/artworks", get(artworks::list_published_artworks))
        .route("/api/artworks/{slug}", get(artworks::get_published_artwork))
        .route("/api/pages", get(pages::list_published_pages))
        .route("/api/pages/{slug}", get(pages::get_published_page))
        .route("/api/collections", get(collections::list_published_collections))
        .route(
            "/api/collections/{slug}",
            get(collections::get_published_collection),
        )
        .route("/api/exhibitions", get(exhibitions::list_published_exhibitions))
        .route(
            "/api/exhibitions/{slug}",
            get(exhibitions::get_published_exhibition),
        )
        .route(
            "/api/performances",
            get(performances::list_published_performances),
        )
        .route(
            "/api/performances/{slug}",
            get(performances::get_published_performance),
        )
        .route("/api/views", post(analytics::record_view))
}

/// Content management for the dashboard
fn dashboard_routes() -> Router<PortfolioState> {
    Router::new()
        .route(
            "/protected/api/artworks",
            get(artworks::list_artworks).post(artworks::create_artwork),
        )
        .route(
            "/protected/api/artworks/{id}",
            patch(artworks::update_artwork).delete(artworks::delete_artwork),
        )
        .route(
            "/protected/api/pages",
            get(pages::list_pages).post(pages::create_page),
        )
        .route(
            "/protected/api/pages/{id}",
            patch(pages::update_page).delete(pages::delete_page),
        )
        .route(
            "/protected/api/collections",
            get(collections::list_collections).post(collections::create_collection),
        )
        .route(
            "/protected/api/collections/{id}",
            patch(collections::update_collection).delete(collections::delete_collection),
        )
        .route(
            "/protected/api/exhibitions",
            get(exhibitions::list_exhibitions).post(exhibitions::create_exhibition),
        )
        .route(
            "/protected/api/exhibitions/{id}",
            patch(exhibitions::update_exhibition).delete(exhibitions::delete_exhibition),
        )
        .route(
            "/protected/api/performances",
            get(performances::list_performances).post(performances::create_performance),
        )
        .route(
            "/protected/api/performances/{id}",
            patch(performances::update_performance).delete(performances::delete_performance),
        )
        .route("/protected/api/analytics", get(analytics::get_summary))
        .route("/protected/api/whoami", get(auth::whoami))
}

/// Login entry point and logout
fn auth_routes() -> Router<PortfolioState> {
    Router::new()
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
}

/// Create all portfolio routes
pub fn routes() -> Router<PortfolioState> {
    Router::new()
        .merge(public_routes())
        .merge(dashboard_routes())
        .merge(auth_routes())
}

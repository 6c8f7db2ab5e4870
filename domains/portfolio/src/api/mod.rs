//! API layer for the portfolio domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::PortfolioState;
pub use routes::routes;

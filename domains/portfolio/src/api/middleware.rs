//! Portfolio domain state

use std::sync::Arc;

use axum::extract::FromRef;
use folio_analytics::AnalyticsService;
use folio_auth::{AuthMode, SessionStore};

use crate::PortfolioRepositories;

/// Application state for the portfolio domain
#[derive(Clone)]
pub struct PortfolioState {
    pub repos: PortfolioRepositories,
    /// Store used by the login and logout endpoints; the gate holds its
    /// own reader and refresher handles
    pub sessions: Arc<dyn SessionStore>,
    pub analytics: Arc<dyn AnalyticsService>,
    pub auth_mode: AuthMode,
}

impl FromRef<PortfolioState> for AuthMode {
    fn from_ref(state: &PortfolioState) -> Self {
        state.auth_mode
    }
}

//! Analytics handlers: the dashboard summary and public view recording

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use folio_analytics::{AnalyticsPeriod, ExternalSummary};
use folio_common::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::api::middleware::PortfolioState;
use crate::domain::analytics::{is_trackable_path, InternalSummary};

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub period: AnalyticsPeriod,
}

/// Fixed-shape summary. `external` is `null` when the provider is
/// unavailable.
#[derive(Debug, Serialize)]
pub struct AnalyticsSummaryResponse {
    pub period: AnalyticsPeriod,
    pub internal: InternalSummary,
    pub external: Option<ExternalSummary>,
}

#[derive(Debug, Deserialize)]
pub struct RecordViewRequest {
    pub path: String,
}

/// Combined first-party and provider metrics for a period
pub async fn get_summary(
    State(state): State<PortfolioState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<AnalyticsSummaryResponse>> {
    let period = query.period;
    let internal = state.repos.analytics.summary(period.days()).await?;

    let external = match state.analytics.aggregate(period).await {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::warn!(
                provider = state.analytics.provider(),
                period = period.as_str(),
                error = %e,
                "Analytics provider unavailable, returning internal metrics only"
            );
            None
        }
    };

    Ok(Json(AnalyticsSummaryResponse {
        period,
        internal,
        external,
    }))
}

/// Record one view of a public path
pub async fn record_view(
    State(state): State<PortfolioState>,
    Json(request): Json<RecordViewRequest>,
) -> Result<StatusCode> {
    if !is_trackable_path(&request.path) {
        return Err(Error::Validation("Path cannot be tracked".to_string()));
    }

    state.repos.analytics.record_view(&request.path).await?;
    Ok(StatusCode::NO_CONTENT)
}

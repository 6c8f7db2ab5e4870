//! Mock analytics service
//!
//! Deterministic numbers that scale with the period.

use crate::{AnalyticsError, AnalyticsPeriod, AnalyticsService, ExternalSummary};

#[derive(Debug, Clone, Default)]
pub struct MockAnalyticsService;

impl MockAnalyticsService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl AnalyticsService for MockAnalyticsService {
    async fn aggregate(&self, period: AnalyticsPeriod) -> Result<ExternalSummary, AnalyticsError> {
        tracing::debug!(period = %period.as_str(), "Mock analytics aggregate");

        let days = period.days() as u64;
        Ok(ExternalSummary {
            visitors: days * 12,
            pageviews: days * 31,
            bounce_rate: 42.0,
            visit_duration: 87.0,
        })
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}

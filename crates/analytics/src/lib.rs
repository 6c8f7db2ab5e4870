//! Folio analytics service
//!
//! Visitor metrics from a third-party analytics provider, exposed through
//! [`AnalyticsService`] so the portfolio domain never sees provider
//! specifics. Providers:
//! - `plausible`: Plausible Stats API v1
//! - `mock`: deterministic numbers for tests and local development

use serde::{Deserialize, Serialize};
use thiserror::Error;

use folio_common::AnalyticsSettings;

pub mod mock;
pub mod plausible;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Analytics configuration error: {0}")]
    Configuration(String),

    #[error("Analytics provider error: {0}")]
    Provider(String),
}

/// Reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnalyticsPeriod {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "12mo")]
    Year,
}

impl AnalyticsPeriod {
    /// Provider/query-string form
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsPeriod::Week => "7d",
            AnalyticsPeriod::Month => "30d",
            AnalyticsPeriod::Year => "12mo",
        }
    }

    /// Length of the window in days
    pub fn days(&self) -> i32 {
        match self {
            AnalyticsPeriod::Week => 7,
            AnalyticsPeriod::Month => 30,
            AnalyticsPeriod::Year => 365,
        }
    }
}

/// Aggregate visitor metrics from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSummary {
    pub visitors: u64,
    pub pageviews: u64,
    /// Percentage, 0-100
    pub bounce_rate: f64,
    /// Seconds
    pub visit_duration: f64,
}

/// Analytics provider
#[async_trait::async_trait]
pub trait AnalyticsService: Send + Sync {
    async fn aggregate(&self, period: AnalyticsPeriod) -> Result<ExternalSummary, AnalyticsError>;

    /// Provider name, for logs
    fn provider(&self) -> &'static str;
}

/// Analytics service factory
pub struct AnalyticsServiceFactory;

impl AnalyticsServiceFactory {
    pub fn create(settings: &AnalyticsSettings) -> Result<Box<dyn AnalyticsService>, AnalyticsError> {
        match settings.provider.as_str() {
            "plausible" => {
                let config = plausible::PlausibleConfig::from_settings(settings)?;
                tracing::info!(site_id = %config.site_id, "Creating Plausible analytics service");
                Ok(Box::new(plausible::PlausibleService::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock analytics service");
                Ok(Box::new(mock::MockAnalyticsService::new()))
            }
            other => Err(AnalyticsError::Configuration(format!(
                "Unsupported analytics provider: {}",
                other
            ))),
        }
    }
}

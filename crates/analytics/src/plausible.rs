//! Plausible Stats API implementation
//!
//! Calls `GET {base}/api/v1/stats/aggregate` with a bearer API key.

use reqwest::Client;
use serde::Deserialize;

use folio_common::AnalyticsSettings;

use crate::{AnalyticsError, AnalyticsPeriod, AnalyticsService, ExternalSummary};

const DEFAULT_BASE_URL: &str = "https://plausible.io";
const METRICS: &str = "visitors,pageviews,bounce_rate,visit_duration";

#[derive(Debug, Clone)]
pub struct PlausibleConfig {
    pub base_url: String,
    pub site_id: String,
    pub api_key: String,
}

impl PlausibleConfig {
    pub fn from_settings(settings: &AnalyticsSettings) -> Result<Self, AnalyticsError> {
        let site_id = settings.site_id.clone().ok_or_else(|| {
            AnalyticsError::Configuration("ANALYTICS_SITE_ID is required for plausible".to_string())
        })?;
        let api_key = settings.api_key.clone().ok_or_else(|| {
            AnalyticsError::Configuration("ANALYTICS_API_KEY is required for plausible".to_string())
        })?;

        Ok(Self {
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            site_id,
            api_key,
        })
    }
}

/// `/api/v1/stats/aggregate` response body
#[derive(Debug, Deserialize)]
struct AggregateResponse {
    results: AggregateResults,
}

#[derive(Debug, Deserialize)]
struct AggregateResults {
    visitors: MetricValue,
    pageviews: MetricValue,
    bounce_rate: MetricValue,
    visit_duration: MetricValue,
}

#[derive(Debug, Deserialize)]
struct MetricValue {
    #[serde(default)]
    value: Option<f64>,
}

impl MetricValue {
    fn get(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }
}

impl From<AggregateResults> for ExternalSummary {
    fn from(r: AggregateResults) -> Self {
        Self {
            visitors: r.visitors.get().max(0.0) as u64,
            pageviews: r.pageviews.get().max(0.0) as u64,
            bounce_rate: r.bounce_rate.get(),
            visit_duration: r.visit_duration.get(),
        }
    }
}

pub struct PlausibleService {
    client: Client,
    config: PlausibleConfig,
}

impl PlausibleService {
    pub fn new(config: PlausibleConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait::async_trait]
impl AnalyticsService for PlausibleService {
    async fn aggregate(&self, period: AnalyticsPeriod) -> Result<ExternalSummary, AnalyticsError> {
        let url = format!("{}/api/v1/stats/aggregate", self.config.base_url);

        tracing::debug!(period = %period.as_str(), "Sending Plausible aggregate request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .query(&[
                ("site_id", self.config.site_id.as_str()),
                ("period", period.as_str()),
                ("metrics", METRICS),
            ])
            .send()
            .await
            .map_err(|e| AnalyticsError::Provider(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Plausible returned an error");
            return Err(AnalyticsError::Provider(format!(
                "Plausible returned {}",
                status
            )));
        }

        let body: AggregateResponse = response
            .json()
            .await
            .map_err(|e| AnalyticsError::Provider(format!("Invalid response body: {}", e)))?;

        Ok(body.results.into())
    }

    fn provider(&self) -> &'static str {
        "plausible"
    }
}

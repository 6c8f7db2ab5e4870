//! First-party view recording and aggregation

use crate::domain::analytics::{InternalSummary, PathViews, TOP_PATHS_LIMIT};
use folio_common::Result;
use sqlx::PgPool;

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    total_views: i64,
    unique_paths: i64,
    top_paths: sqlx::types::Json<Vec<PathViews>>,
}

#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record_view(&self, path: &str) -> Result<()> {
        sqlx::query("INSERT INTO page_views (path) VALUES ($1)")
            .bind(path)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Aggregate views over the last `days` days via `analytics_summary`
    pub async fn summary(&self, days: i32) -> Result<InternalSummary> {
        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT total_views, unique_paths, top_paths
            FROM analytics_summary(make_interval(days => $1), $2)
            "#,
        )
        .bind(days)
        .bind(TOP_PATHS_LIMIT)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(|r| InternalSummary {
                total_views: r.total_views,
                unique_paths: r.unique_paths,
                top_paths: r.top_paths.0,
            })
            .unwrap_or_default())
    }
}

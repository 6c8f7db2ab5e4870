//! Performance repository

use crate::domain::entities::Performance;
use chrono::NaiveDate;
use folio_common::{RepositoryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewPerformance {
    pub slug: String,
    pub title: String,
    pub venue: Option<String>,
    pub performed_on: NaiveDate,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub published: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PerformanceChanges {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub venue: Option<String>,
    pub performed_on: Option<NaiveDate>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub published: Option<bool>,
}

#[derive(Clone)]
pub struct PerformanceRepository {
    pool: PgPool,
}

impl PerformanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_published(
        &self,
        upcoming_from: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Performance>> {
        let performances = sqlx::query_as::<_, Performance>(
            r#"
            SELECT id, slug, title, venue, performed_on, description,
                   video_url, published, created_at, updated_at
            FROM performances
            WHERE published = true
              AND ($1::date IS NULL OR performed_on >= $1)
            ORDER BY
                CASE WHEN $1::date IS NULL THEN NULL ELSE performed_on END ASC,
                performed_on DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(upcoming_from)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(performances)
    }

    pub async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Performance>> {
        let performance = sqlx::query_as::<_, Performance>(
            r#"
            SELECT id, slug, title, venue, performed_on, description,
                   video_url, published, created_at, updated_at
            FROM performances
            WHERE slug = $1 AND published = true
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(performance)
    }

    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Performance>> {
        let performances = sqlx::query_as::<_, Performance>(
            r#"
            SELECT id, slug, title, venue, performed_on, description,
                   video_url, published, created_at, updated_at
            FROM performances
            ORDER BY performed_on DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(performances)
    }

    pub async fn create(&self, new: &NewPerformance) -> Result<Performance> {
        let performance = sqlx::query_as::<_, Performance>(
            r#"
            INSERT INTO performances (slug, title, venue, performed_on,
                                      description, video_url, published)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, slug, title, venue, performed_on, description,
                      video_url, published, created_at, updated_at
            "#,
        )
        .bind(&new.slug)
        .bind(&new.title)
        .bind(&new.venue)
        .bind(new.performed_on)
        .bind(&new.description)
        .bind(&new.video_url)
        .bind(new.published)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(performance)
    }

    pub async fn update(&self, id: Uuid, changes: &PerformanceChanges) -> Result<Performance> {
        let performance = sqlx::query_as::<_, Performance>(
            r#"
            UPDATE performances SET
                slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                venue = COALESCE($4, venue),
                performed_on = COALESCE($5, performed_on),
                description = COALESCE($6, description),
                video_url = COALESCE($7, video_url),
                published = COALESCE($8, published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, slug, title, venue, performed_on, description,
                      video_url, published, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.slug)
        .bind(&changes.title)
        .bind(&changes.venue)
        .bind(changes.performed_on)
        .bind(&changes.description)
        .bind(&changes.video_url)
        .bind(changes.published)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(performance)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM performances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound.into());
        }
        Ok(())
    }
}

//! Exhibition repository

use crate::domain::entities::Exhibition;
use chrono::NaiveDate;
use folio_common::{RepositoryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewExhibition {
    pub slug: String,
    pub title: String,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub published: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ExhibitionChanges {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub published: Option<bool>,
}

#[derive(Clone)]
pub struct ExhibitionRepository {
    pool: PgPool,
}

impl ExhibitionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List published exhibitions, newest first. With `upcoming_from`,
    /// only shows still running on or after that date, soonest first.
    pub async fn list_published(
        &self,
        upcoming_from: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Exhibition>> {
        let exhibitions = sqlx::query_as::<_, Exhibition>(
            r#"
            SELECT id, slug, title, venue, city, starts_on, ends_on,
                   description, url, published, created_at, updated_at
            FROM exhibitions
            WHERE published = true
              AND ($1::date IS NULL OR COALESCE(ends_on, starts_on) >= $1)
            ORDER BY
                CASE WHEN $1::date IS NULL THEN NULL ELSE starts_on END ASC,
                starts_on DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(upcoming_from)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(exhibitions)
    }

    pub async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Exhibition>> {
        let exhibition = sqlx::query_as::<_, Exhibition>(
            r#"
            SELECT id, slug, title, venue, city, starts_on, ends_on,
                   description, url, published, created_at, updated_at
            FROM exhibitions
            WHERE slug = $1 AND published = true
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(exhibition)
    }

    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Exhibition>> {
        let exhibitions = sqlx::query_as::<_, Exhibition>(
            r#"
            SELECT id, slug, title, venue, city, starts_on, ends_on,
                   description, url, published, created_at, updated_at
            FROM exhibitions
            ORDER BY starts_on DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(exhibitions)
    }

    pub async fn create(&self, new: &NewExhibition) -> Result<Exhibition> {
        let exhibition = sqlx::query_as::<_, Exhibition>(
            r#"
            INSERT INTO exhibitions (slug, title, venue, city, starts_on, ends_on,
                                     description, url, published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, slug, title, venue, city, starts_on, ends_on,
                      description, url, published, created_at, updated_at
            "#,
        )
        .bind(&new.slug)
        .bind(&new.title)
        .bind(&new.venue)
        .bind(&new.city)
        .bind(new.starts_on)
        .bind(new.ends_on)
        .bind(&new.description)
        .bind(&new.url)
        .bind(new.published)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(exhibition)
    }

    pub async fn update(&self, id: Uuid, changes: &ExhibitionChanges) -> Result<Exhibition> {
        let exhibition = sqlx::query_as::<_, Exhibition>(
            r#"
            UPDATE exhibitions SET
                slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                venue = COALESCE($4, venue),
                city = COALESCE($5, city),
                starts_on = COALESCE($6, starts_on),
                ends_on = COALESCE($7, ends_on),
                description = COALESCE($8, description),
                url = COALESCE($9, url),
                published = COALESCE($10, published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, slug, title, venue, city, starts_on, ends_on,
                      description, url, published, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.slug)
        .bind(&changes.title)
        .bind(&changes.venue)
        .bind(&changes.city)
        .bind(changes.starts_on)
        .bind(changes.ends_on)
        .bind(&changes.description)
        .bind(&changes.url)
        .bind(changes.published)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(exhibition)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM exhibitions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound.into());
        }
        Ok(())
    }
}

//! Artwork repository

use crate::domain::entities::Artwork;
use folio_common::{RepositoryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// Optional filters for the public artwork listing
#[derive(Debug, Clone, Default)]
pub struct ArtworkFilter {
    /// Collection slug
    pub collection: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewArtwork {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub medium: Option<String>,
    pub year: Option<i32>,
    pub dimensions: Option<String>,
    pub image_url: Option<String>,
    pub collection_id: Option<Uuid>,
    pub sort_order: i32,
    pub published: bool,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ArtworkChanges {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub medium: Option<String>,
    pub year: Option<i32>,
    pub dimensions: Option<String>,
    pub image_url: Option<String>,
    pub collection_id: Option<Uuid>,
    pub sort_order: Option<i32>,
    pub published: Option<bool>,
}

#[derive(Clone)]
pub struct ArtworkRepository {
    pool: PgPool,
}

impl ArtworkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List published artworks, optionally by collection slug and year
    pub async fn list_published(
        &self,
        filter: &ArtworkFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Artwork>> {
        let artworks = sqlx::query_as::<_, Artwork>(
            r#"
            SELECT a.id, a.slug, a.title, a.description, a.medium, a.year,
                   a.dimensions, a.image_url, a.collection_id, a.sort_order,
                   a.published, a.created_at, a.updated_at
            FROM artworks a
            LEFT JOIN collections c ON c.id = a.collection_id
            WHERE a.published = true
              AND ($1::text IS NULL OR (c.slug = $1 AND c.published = true))
              AND ($2::int IS NULL OR a.year = $2)
            ORDER BY a.sort_order, a.year DESC NULLS LAST, a.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.collection.as_deref())
        .bind(filter.year)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(artworks)
    }

    /// Find a published artwork by slug
    pub async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Artwork>> {
        let artwork = sqlx::query_as::<_, Artwork>(
            r#"
            SELECT id, slug, title, description, medium, year,
                   dimensions, image_url, collection_id, sort_order,
                   published, created_at, updated_at
            FROM artworks
            WHERE slug = $1 AND published = true
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(artwork)
    }

    /// List every artwork, drafts included
    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Artwork>> {
        let artworks = sqlx::query_as::<_, Artwork>(
            r#"
            SELECT id, slug, title, description, medium, year,
                   dimensions, image_url, collection_id, sort_order,
                   published, created_at, updated_at
            FROM artworks
            ORDER BY updated_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(artworks)
    }

    pub async fn create(&self, new: &NewArtwork) -> Result<Artwork> {
        let artwork = sqlx::query_as::<_, Artwork>(
            r#"
            INSERT INTO artworks (slug, title, description, medium, year,
                                  dimensions, image_url, collection_id,
                                  sort_order, published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, slug, title, description, medium, year,
                      dimensions, image_url, collection_id, sort_order,
                      published, created_at, updated_at
            "#,
        )
        .bind(&new.slug)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.medium)
        .bind(new.year)
        .bind(&new.dimensions)
        .bind(&new.image_url)
        .bind(new.collection_id)
        .bind(new.sort_order)
        .bind(new.published)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(artwork)
    }

    /// Apply a partial update; `NotFound` when no row has `id`
    pub async fn update(&self, id: Uuid, changes: &ArtworkChanges) -> Result<Artwork> {
        let artwork = sqlx::query_as::<_, Artwork>(
            r#"
            UPDATE artworks SET
                slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                medium = COALESCE($5, medium),
                year = COALESCE($6, year),
                dimensions = COALESCE($7, dimensions),
                image_url = COALESCE($8, image_url),
                collection_id = COALESCE($9, collection_id),
                sort_order = COALESCE($10, sort_order),
                published = COALESCE($11, published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, slug, title, description, medium, year,
                      dimensions, image_url, collection_id, sort_order,
                      published, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.slug)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.medium)
        .bind(changes.year)
        .bind(&changes.dimensions)
        .bind(&changes.image_url)
        .bind(changes.collection_id)
        .bind(changes.sort_order)
        .bind(changes.published)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(artwork)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM artworks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound.into());
        }
        Ok(())
    }
}

//! Collection repository

use crate::domain::entities::Collection;
use folio_common::{RepositoryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewCollection {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub sort_order: i32,
    pub published: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CollectionChanges {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub sort_order: Option<i32>,
    pub published: Option<bool>,
}

#[derive(Clone)]
pub struct CollectionRepository {
    pool: PgPool,
}

impl CollectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_published(&self, limit: i64, offset: i64) -> Result<Vec<Collection>> {
        let collections = sqlx::query_as::<_, Collection>(
            r#"
            SELECT id, slug, title, description, cover_image_url,
                   sort_order, published, created_at, updated_at
            FROM collections
            WHERE published = true
            ORDER BY sort_order, title
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(collections)
    }

    pub async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Collection>> {
        let collection = sqlx::query_as::<_, Collection>(
            r#"
            SELECT id, slug, title, description, cover_image_url,
                   sort_order, published, created_at, updated_at
            FROM collections
            WHERE slug = $1 AND published = true
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(collection)
    }

    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Collection>> {
        let collections = sqlx::query_as::<_, Collection>(
            r#"
            SELECT id, slug, title, description, cover_image_url,
                   sort_order, published, created_at, updated_at
            FROM collections
            ORDER BY sort_order, title
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(collections)
    }

    pub async fn create(&self, new: &NewCollection) -> Result<Collection> {
        let collection = sqlx::query_as::<_, Collection>(
            r#"
            INSERT INTO collections (slug, title, description, cover_image_url,
                                     sort_order, published)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, slug, title, description, cover_image_url,
                      sort_order, published, created_at, updated_at
            "#,
        )
        .bind(&new.slug)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.cover_image_url)
        .bind(new.sort_order)
        .bind(new.published)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(collection)
    }

    pub async fn update(&self, id: Uuid, changes: &CollectionChanges) -> Result<Collection> {
        let collection = sqlx::query_as::<_, Collection>(
            r#"
            UPDATE collections SET
                slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                cover_image_url = COALESCE($5, cover_image_url),
                sort_order = COALESCE($6, sort_order),
                published = COALESCE($7, published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, slug, title, description, cover_image_url,
                      sort_order, published, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.slug)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.cover_image_url)
        .bind(changes.sort_order)
        .bind(changes.published)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(collection)
    }

    /// Delete a collection; its artworks are kept and lose the reference
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound.into());
        }
        Ok(())
    }
}

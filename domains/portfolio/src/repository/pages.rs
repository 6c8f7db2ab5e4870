//! Page repository

use crate::domain::entities::{Page, PageContentType};
use folio_common::{RepositoryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewPage {
    pub slug: String,
    pub title: String,
    pub body: Option<String>,
    pub content_type: PageContentType,
    pub sort_order: i32,
    pub published: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PageChanges {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub content_type: Option<PageContentType>,
    pub sort_order: Option<i32>,
    pub published: Option<bool>,
}

#[derive(Clone)]
pub struct PageRepository {
    pool: PgPool,
}

impl PageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_published(&self, limit: i64, offset: i64) -> Result<Vec<Page>> {
        let pages = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, slug, title, body, content_type, sort_order,
                   published, created_at, updated_at
            FROM pages
            WHERE published = true
            ORDER BY sort_order, title
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(pages)
    }

    pub async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Page>> {
        let page = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, slug, title, body, content_type, sort_order,
                   published, created_at, updated_at
            FROM pages
            WHERE slug = $1 AND published = true
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(page)
    }

    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Page>> {
        let pages = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, slug, title, body, content_type, sort_order,
                   published, created_at, updated_at
            FROM pages
            ORDER BY sort_order, title
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(pages)
    }

    pub async fn create(&self, new: &NewPage) -> Result<Page> {
        let page = sqlx::query_as::<_, Page>(
            r#"
            INSERT INTO pages (slug, title, body, content_type, sort_order, published)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, slug, title, body, content_type, sort_order,
                      published, created_at, updated_at
            "#,
        )
        .bind(&new.slug)
        .bind(&new.title)
        .bind(&new.body)
        .bind(new.content_type)
        .bind(new.sort_order)
        .bind(new.published)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(page)
    }

    pub async fn update(&self, id: Uuid, changes: &PageChanges) -> Result<Page> {
        let page = sqlx::query_as::<_, Page>(
            r#"
            UPDATE pages SET
                slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                body = COALESCE($4, body),
                content_type = COALESCE($5, content_type),
                sort_order = COALESCE($6, sort_order),
                published = COALESCE($7, published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, slug, title, body, content_type, sort_order,
                      published, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.slug)
        .bind(&changes.title)
        .bind(&changes.body)
        .bind(changes.content_type)
        .bind(changes.sort_order)
        .bind(changes.published)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(page)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound.into());
        }
        Ok(())
    }
}

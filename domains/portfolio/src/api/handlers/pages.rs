//! Page API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use folio_auth::SessionUser;
use folio_common::{Error, Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{actor_id, validate_slug_format};
use crate::api::middleware::PortfolioState;
use crate::domain::entities::{Page, PageContentType};
use crate::repository::{NewPage, PageChanges};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub body: Option<String>,
    pub content_type: PageContentType,
    pub sort_order: i32,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Page> for PageResponse {
    fn from(p: Page) -> Self {
        Self {
            id: p.id,
            slug: p.slug,
            title: p.title,
            body: p.body,
            content_type: p.content_type,
            sort_order: p.sort_order,
            published: p.published,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_slug_format", message = "Invalid slug format")
    )]
    pub slug: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 100000))]
    pub body: Option<String>,

    #[serde(default)]
    pub content_type: PageContentType,

    #[serde(default)]
    pub sort_order: i32,

    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_slug_format", message = "Invalid slug format")
    )]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 100000))]
    pub body: Option<String>,

    pub content_type: Option<PageContentType>,
    pub sort_order: Option<i32>,
    pub published: Option<bool>,
}

pub async fn list_published_pages(
    State(state): State<PortfolioState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<PageResponse>>> {
    let pages = state
        .repos
        .pages
        .list_published(pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(pages.into_iter().map(Into::into).collect()))
}

pub async fn get_published_page(
    State(state): State<PortfolioState>,
    Path(slug): Path<String>,
) -> Result<Json<PageResponse>> {
    let page = state
        .repos
        .pages
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| Error::NotFound("Page not found".to_string()))?;

    Ok(Json(page.into()))
}

pub async fn list_pages(
    State(state): State<PortfolioState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<PageResponse>>> {
    let pages = state
        .repos
        .pages
        .list_all(pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(pages.into_iter().map(Into::into).collect()))
}

pub async fn create_page(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    ValidatedJson(request): ValidatedJson<CreatePageRequest>,
) -> Result<(StatusCode, Json<PageResponse>)> {
    let new = NewPage {
        slug: request.slug,
        title: request.title,
        body: request.body,
        content_type: request.content_type,
        sort_order: request.sort_order,
        published: request.published,
    };
    let page = state.repos.pages.create(&new).await?;

    tracing::info!(page_id = %page.id, slug = %page.slug, actor = ?actor_id(&user), "Page created");

    Ok((StatusCode::CREATED, Json(page.into())))
}

pub async fn update_page(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdatePageRequest>,
) -> Result<Json<PageResponse>> {
    let changes = PageChanges {
        slug: request.slug,
        title: request.title,
        body: request.body,
        content_type: request.content_type,
        sort_order: request.sort_order,
        published: request.published,
    };
    let page = state.repos.pages.update(id, &changes).await?;

    tracing::info!(page_id = %page.id, actor = ?actor_id(&user), "Page updated");

    Ok(Json(page.into()))
}

pub async fn delete_page(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.repos.pages.delete(id).await?;

    tracing::info!(page_id = %id, actor = ?actor_id(&user), "Page deleted");

    Ok(StatusCode::NO_CONTENT)
}

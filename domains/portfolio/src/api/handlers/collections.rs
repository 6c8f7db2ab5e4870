//! Collection API handlers

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
use crate::domain::entities::Collection;
use crate::repository::{CollectionChanges, NewCollection};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub sort_order: i32,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Collection> for CollectionResponse {
    fn from(c: Collection) -> Self {
        Self {
            id: c.id,
            slug: c.slug,
            title: c.title,
            description: c.description,
            cover_image_url: c.cover_image_url,
            sort_order: c.sort_order,
            published: c.published,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest {
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_slug_format", message = "Invalid slug format")
    )]
    pub slug: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 10000))]
    pub description: Option<String>,

    #[validate(url)]
    pub cover_image_url: Option<String>,

    #[serde(default)]
    pub sort_order: i32,

    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectionRequest {
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_slug_format", message = "Invalid slug format")
    )]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 10000))]
    pub description: Option<String>,

    #[validate(url)]
    pub cover_image_url: Option<String>,

    pub sort_order: Option<i32>,
    pub published: Option<bool>,
}

pub async fn list_published_collections(
    State(state): State<PortfolioState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<CollectionResponse>>> {
    let collections = state
        .repos
        .collections
        .list_published(pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(collections.into_iter().map(Into::into).collect()))
}

pub async fn get_published_collection(
    State(state): State<PortfolioState>,
    Path(slug): Path<String>,
) -> Result<Json<CollectionResponse>> {
    let collection = state
        .repos
        .collections
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| Error::NotFound("Collection not found".to_string()))?;

    Ok(Json(collection.into()))
}

pub async fn list_collections(
    State(state): State<PortfolioState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<CollectionResponse>>> {
    let collections = state
        .repos
        .collections
        .list_all(pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(collections.into_iter().map(Into::into).collect()))
}

pub async fn create_collection(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    ValidatedJson(request): ValidatedJson<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<CollectionResponse>)> {
    let new = NewCollection {
        slug: request.slug,
        title: request.title,
        description: request.description,
        cover_image_url: request.cover_image_url,
        sort_order: request.sort_order,
        published: request.published,
    };
    let collection = state.repos.collections.create(&new).await?;

    tracing::info!(
        collection_id = %collection.id,
        slug = %collection.slug,
        actor = ?actor_id(&user),
        "Collection created"
    );

    Ok((StatusCode::CREATED, Json(collection.into())))
}

pub async fn update_collection(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateCollectionRequest>,
) -> Result<Json<CollectionResponse>> {
    let changes = CollectionChanges {
        slug: request.slug,
        title: request.title,
        description: request.description,
        cover_image_url: request.cover_image_url,
        sort_order: request.sort_order,
        published: request.published,
    };
    let collection = state.repos.collections.update(id, &changes).await?;

    tracing::info!(collection_id = %collection.id, actor = ?actor_id(&user), "Collection updated");

    Ok(Json(collection.into()))
}

/// Delete a collection; its artworks stay, unassigned
pub async fn delete_collection(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.repos.collections.delete(id).await?;

    tracing::info!(collection_id = %id, actor = ?actor_id(&user), "Collection deleted");

    Ok(StatusCode::NO_CONTENT)
}

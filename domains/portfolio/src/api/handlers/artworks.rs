//! Artwork API handlers

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
use crate::domain::entities::Artwork;
use crate::repository::{ArtworkChanges, ArtworkFilter, NewArtwork};

/// Artwork response DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkResponse {
    pub id: Uuid,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Artwork> for ArtworkResponse {
    fn from(a: Artwork) -> Self {
        Self {
            id: a.id,
            slug: a.slug,
            title: a.title,
            description: a.description,
            medium: a.medium,
            year: a.year,
            dimensions: a.dimensions,
            image_url: a.image_url,
            collection_id: a.collection_id,
            sort_order: a.sort_order,
            published: a.published,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// `?collection=&year=` filters for the public listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtworkQuery {
    pub collection: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtworkRequest {
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_slug_format", message = "Invalid slug format")
    )]
    pub slug: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 10000))]
    pub description: Option<String>,

    #[validate(length(max = 200))]
    pub medium: Option<String>,

    #[validate(range(min = 1000, max = 9999))]
    pub year: Option<i32>,

    #[validate(length(max = 200))]
    pub dimensions: Option<String>,

    #[validate(url)]
    pub image_url: Option<String>,

    pub collection_id: Option<Uuid>,

    #[serde(default)]
    pub sort_order: i32,

    #[serde(default)]
    pub published: bool,
}

impl From<CreateArtworkRequest> for NewArtwork {
    fn from(r: CreateArtworkRequest) -> Self {
        Self {
            slug: r.slug,
            title: r.title,
            description: r.description,
            medium: r.medium,
            year: r.year,
            dimensions: r.dimensions,
            image_url: r.image_url,
            collection_id: r.collection_id,
            sort_order: r.sort_order,
            published: r.published,
        }
    }
}

/// Partial update; omitted fields are left as they are
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtworkRequest {
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_slug_format", message = "Invalid slug format")
    )]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 10000))]
    pub description: Option<String>,

    #[validate(length(max = 200))]
    pub medium: Option<String>,

    #[validate(range(min = 1000, max = 9999))]
    pub year: Option<i32>,

    #[validate(length(max = 200))]
    pub dimensions: Option<String>,

    #[validate(url)]
    pub image_url: Option<String>,

    pub collection_id: Option<Uuid>,
    pub sort_order: Option<i32>,
    pub published: Option<bool>,
}

impl From<UpdateArtworkRequest> for ArtworkChanges {
    fn from(r: UpdateArtworkRequest) -> Self {
        Self {
            slug: r.slug,
            title: r.title,
            description: r.description,
            medium: r.medium,
            year: r.year,
            dimensions: r.dimensions,
            image_url: r.image_url,
            collection_id: r.collection_id,
            sort_order: r.sort_order,
            published: r.published,
        }
    }
}

/// List published artworks
pub async fn list_published_artworks(
    State(state): State<PortfolioState>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<ArtworkQuery>,
) -> Result<Json<Vec<ArtworkResponse>>> {
    let filter = ArtworkFilter {
        collection: query.collection,
        year: query.year,
    };
    let artworks = state
        .repos
        .artworks
        .list_published(&filter, pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(artworks.into_iter().map(Into::into).collect()))
}

/// Get a published artwork by slug
pub async fn get_published_artwork(
    State(state): State<PortfolioState>,
    Path(slug): Path<String>,
) -> Result<Json<ArtworkResponse>> {
    let artwork = state
        .repos
        .artworks
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| Error::NotFound("Artwork not found".to_string()))?;

    Ok(Json(artwork.into()))
}

/// List all artworks, drafts included
pub async fn list_artworks(
    State(state): State<PortfolioState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<ArtworkResponse>>> {
    let artworks = state
        .repos
        .artworks
        .list_all(pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(artworks.into_iter().map(Into::into).collect()))
}

pub async fn create_artwork(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    ValidatedJson(request): ValidatedJson<CreateArtworkRequest>,
) -> Result<(StatusCode, Json<ArtworkResponse>)> {
    let artwork = state.repos.artworks.create(&request.into()).await?;

    tracing::info!(
        artwork_id = %artwork.id,
        slug = %artwork.slug,
        actor = ?actor_id(&user),
        "Artwork created"
    );

    Ok((StatusCode::CREATED, Json(artwork.into())))
}

pub async fn update_artwork(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateArtworkRequest>,
) -> Result<Json<ArtworkResponse>> {
    let artwork = state.repos.artworks.update(id, &request.into()).await?;

    tracing::info!(artwork_id = %artwork.id, actor = ?actor_id(&user), "Artwork updated");

    Ok(Json(artwork.into()))
}

pub async fn delete_artwork(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.repos.artworks.delete(id).await?;

    tracing::info!(artwork_id = %id, actor = ?actor_id(&user), "Artwork deleted");

    Ok(StatusCode::NO_CONTENT)
}

//! Exhibition API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use folio_auth::SessionUser;
use folio_common::{Error, Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{actor_id, validate_slug_format, UpcomingQuery};
use crate::api::middleware::PortfolioState;
use crate::domain::entities::Exhibition;
use crate::repository::{ExhibitionChanges, NewExhibition};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Exhibition> for ExhibitionResponse {
    fn from(e: Exhibition) -> Self {
        Self {
            id: e.id,
            slug: e.slug,
            title: e.title,
            venue: e.venue,
            city: e.city,
            starts_on: e.starts_on,
            ends_on: e.ends_on,
            description: e.description,
            url: e.url,
            published: e.published,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExhibitionRequest {
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_slug_format", message = "Invalid slug format")
    )]
    pub slug: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 200))]
    pub venue: Option<String>,

    #[validate(length(max = 200))]
    pub city: Option<String>,

    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,

    #[validate(length(max = 10000))]
    pub description: Option<String>,

    #[validate(url)]
    pub url: Option<String>,

    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExhibitionRequest {
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_slug_format", message = "Invalid slug format")
    )]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 200))]
    pub venue: Option<String>,

    #[validate(length(max = 200))]
    pub city: Option<String>,

    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,

    #[validate(length(max = 10000))]
    pub description: Option<String>,

    #[validate(url)]
    pub url: Option<String>,

    pub published: Option<bool>,
}

pub async fn list_published_exhibitions(
    State(state): State<PortfolioState>,
    Query(pagination): Query<Pagination>,
    Query(upcoming): Query<UpcomingQuery>,
) -> Result<Json<Vec<ExhibitionResponse>>> {
    let exhibitions = state
        .repos
        .exhibitions
        .list_published(upcoming.from_date(), pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(exhibitions.into_iter().map(Into::into).collect()))
}

pub async fn get_published_exhibition(
    State(state): State<PortfolioState>,
    Path(slug): Path<String>,
) -> Result<Json<ExhibitionResponse>> {
    let exhibition = state
        .repos
        .exhibitions
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| Error::NotFound("Exhibition not found".to_string()))?;

    Ok(Json(exhibition.into()))
}

pub async fn list_exhibitions(
    State(state): State<PortfolioState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<ExhibitionResponse>>> {
    let exhibitions = state
        .repos
        .exhibitions
        .list_all(pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(exhibitions.into_iter().map(Into::into).collect()))
}

pub async fn create_exhibition(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    ValidatedJson(request): ValidatedJson<CreateExhibitionRequest>,
) -> Result<(StatusCode, Json<ExhibitionResponse>)> {
    Exhibition::validate_dates(request.starts_on, request.ends_on)?;

    let new = NewExhibition {
        slug: request.slug,
        title: request.title,
        venue: request.venue,
        city: request.city,
        starts_on: request.starts_on,
        ends_on: request.ends_on,
        description: request.description,
        url: request.url,
        published: request.published,
    };
    let exhibition = state.repos.exhibitions.create(&new).await?;

    tracing::info!(
        exhibition_id = %exhibition.id,
        slug = %exhibition.slug,
        actor = ?actor_id(&user),
        "Exhibition created"
    );

    Ok((StatusCode::CREATED, Json(exhibition.into())))
}

/// Partial update. A date pair that only becomes inconsistent against the
/// stored row is rejected by the table's check constraint.
pub async fn update_exhibition(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateExhibitionRequest>,
) -> Result<Json<ExhibitionResponse>> {
    if let Some(starts_on) = request.starts_on {
        Exhibition::validate_dates(starts_on, request.ends_on)?;
    }

    let changes = ExhibitionChanges {
        slug: request.slug,
        title: request.title,
        venue: request.venue,
        city: request.city,
        starts_on: request.starts_on,
        ends_on: request.ends_on,
        description: request.description,
        url: request.url,
        published: request.published,
    };
    let exhibition = state.repos.exhibitions.update(id, &changes).await?;

    tracing::info!(exhibition_id = %exhibition.id, actor = ?actor_id(&user), "Exhibition updated");

    Ok(Json(exhibition.into()))
}

pub async fn delete_exhibition(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.repos.exhibitions.delete(id).await?;

    tracing::info!(exhibition_id = %id, actor = ?actor_id(&user), "Exhibition deleted");

    Ok(StatusCode::NO_CONTENT)
}

//! Performance API handlers

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
use crate::domain::entities::Performance;
use crate::repository::{NewPerformance, PerformanceChanges};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub venue: Option<String>,
    pub performed_on: NaiveDate,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Performance> for PerformanceResponse {
    fn from(p: Performance) -> Self {
        Self {
            id: p.id,
            slug: p.slug,
            title: p.title,
            venue: p.venue,
            performed_on: p.performed_on,
            description: p.description,
            video_url: p.video_url,
            published: p.published,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePerformanceRequest {
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_slug_format", message = "Invalid slug format")
    )]
    pub slug: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 200))]
    pub venue: Option<String>,

    pub performed_on: NaiveDate,

    #[validate(length(max = 10000))]
    pub description: Option<String>,

    #[validate(url)]
    pub video_url: Option<String>,

    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePerformanceRequest {
    #[validate(
        length(min = 1, max = 120),
        custom(function = "validate_slug_format", message = "Invalid slug format")
    )]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 200))]
    pub venue: Option<String>,

    pub performed_on: Option<NaiveDate>,

    #[validate(length(max = 10000))]
    pub description: Option<String>,

    #[validate(url)]
    pub video_url: Option<String>,

    pub published: Option<bool>,
}

pub async fn list_published_performances(
    State(state): State<PortfolioState>,
    Query(pagination): Query<Pagination>,
    Query(upcoming): Query<UpcomingQuery>,
) -> Result<Json<Vec<PerformanceResponse>>> {
    let performances = state
        .repos
        .performances
        .list_published(upcoming.from_date(), pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(performances.into_iter().map(Into::into).collect()))
}

pub async fn get_published_performance(
    State(state): State<PortfolioState>,
    Path(slug): Path<String>,
) -> Result<Json<PerformanceResponse>> {
    let performance = state
        .repos
        .performances
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| Error::NotFound("Performance not found".to_string()))?;

    Ok(Json(performance.into()))
}

pub async fn list_performances(
    State(state): State<PortfolioState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<PerformanceResponse>>> {
    let performances = state
        .repos
        .performances
        .list_all(pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(performances.into_iter().map(Into::into).collect()))
}

pub async fn create_performance(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    ValidatedJson(request): ValidatedJson<CreatePerformanceRequest>,
) -> Result<(StatusCode, Json<PerformanceResponse>)> {
    let new = NewPerformance {
        slug: request.slug,
        title: request.title,
        venue: request.venue,
        performed_on: request.performed_on,
        description: request.description,
        video_url: request.video_url,
        published: request.published,
    };
    let performance = state.repos.performances.create(&new).await?;

    tracing::info!(
        performance_id = %performance.id,
        slug = %performance.slug,
        actor = ?actor_id(&user),
        "Performance created"
    );

    Ok((StatusCode::CREATED, Json(performance.into())))
}

pub async fn update_performance(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdatePerformanceRequest>,
) -> Result<Json<PerformanceResponse>> {
    let changes = PerformanceChanges {
        slug: request.slug,
        title: request.title,
        venue: request.venue,
        performed_on: request.performed_on,
        description: request.description,
        video_url: request.video_url,
        published: request.published,
    };
    let performance = state.repos.performances.update(id, &changes).await?;

    tracing::info!(performance_id = %performance.id, actor = ?actor_id(&user), "Performance updated");

    Ok(Json(performance.into()))
}

pub async fn delete_performance(
    user: Option<SessionUser>,
    State(state): State<PortfolioState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.repos.performances.delete(id).await?;

    tracing::info!(performance_id = %id, actor = ?actor_id(&user), "Performance deleted");

    Ok(StatusCode::NO_CONTENT)
}

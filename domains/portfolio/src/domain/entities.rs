//! Portfolio content entities
//!
//! Every entity shares `id`, `slug`, `title`, `published` and timestamps.
//! Public endpoints only ever see rows with `published = true`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

use folio_common::{Error, Result};

/// Maximum slug length
pub const MAX_SLUG_LENGTH: usize = 120;

/// Lowercase ASCII alphanumerics and hyphens (compiled once)
static SLUG_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[a-z0-9-]+$").expect("slug regex is valid"));

/// Validate a URL slug
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        return Err(Error::Validation(format!(
            "Slug must be 1-{} characters",
            MAX_SLUG_LENGTH
        )));
    }
    if !SLUG_REGEX.is_match(slug) {
        return Err(Error::Validation(
            "Slug may only contain lowercase letters, digits and hyphens".to_string(),
        ));
    }
    Ok(())
}

/// How a page renders its body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "page_content_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PageContentType {
    #[default]
    Text,
    Gallery,
    Embed,
}

impl std::fmt::Display for PageContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageContentType::Text => write!(f, "text"),
            PageContentType::Gallery => write!(f, "gallery"),
            PageContentType::Embed => write!(f, "embed"),
        }
    }
}

/// A single work
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Artwork {
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

/// A free-standing page (about, statement, contact...)
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Page {
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

/// A named group of artworks
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Collection {
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

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Exhibition {
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

impl Exhibition {
    /// Still running or yet to open on `today`
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.ends_on.unwrap_or(self.starts_on) >= today
    }

    /// End date, when given, must not precede the start
    pub fn validate_dates(starts_on: NaiveDate, ends_on: Option<NaiveDate>) -> Result<()> {
        match ends_on {
            Some(end) if end < starts_on => Err(Error::Validation(
                "Exhibition cannot end before it starts".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Performance {
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

impl Performance {
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.performed_on >= today
    }
}

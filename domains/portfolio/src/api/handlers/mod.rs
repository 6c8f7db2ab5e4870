//! HTTP handlers for the portfolio domain

pub mod analytics;
pub mod artworks;
pub mod auth;
pub mod collections;
pub mod exhibitions;
pub mod pages;
pub mod performances;

/// `validator` adapter for slug fields
pub(crate) fn validate_slug_format(
    slug: &str,
) -> std::result::Result<(), validator::ValidationError> {
    crate::validate_slug(slug).map_err(|_| validator::ValidationError::new("invalid_format"))
}

/// Actor id for audit logs; `None` while auth is disabled
pub(crate) fn actor_id(user: &Option<folio_auth::SessionUser>) -> Option<uuid::Uuid> {
    user.as_ref().map(|u| u.0.id)
}

/// Today's date for `upcoming=true` filters
#[mutants::skip] // Wall clock
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// `?upcoming=true` on the exhibition and performance listings
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
pub struct UpcomingQuery {
    #[serde(default)]
    pub upcoming: bool,
}

impl UpcomingQuery {
    pub fn from_date(&self) -> Option<chrono::NaiveDate> {
        self.upcoming.then(today)
    }
}

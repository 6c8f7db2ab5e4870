//! Portfolio domain: artworks, pages, collections, exhibitions, performances
//!
//! Public read endpoints serve published content; dashboard endpoints under
//! `/protected` manage everything, drafts included.

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::analytics::{InternalSummary, PathViews};
pub use domain::entities::{
    validate_slug, Artwork, Collection, Exhibition, Page, PageContentType, Performance,
};

// Re-export repository types
pub use repository::{
    AnalyticsRepository, ArtworkRepository, CollectionRepository, ExhibitionRepository,
    PageRepository, PerformanceRepository, PortfolioRepositories,
};

// Re-export API types
pub use api::routes;
pub use api::PortfolioState;

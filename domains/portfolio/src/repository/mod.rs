//! Repository implementations for the portfolio domain

pub mod analytics;
pub mod artworks;
pub mod collections;
pub mod exhibitions;
pub mod pages;
pub mod performances;

use sqlx::PgPool;

pub use analytics::AnalyticsRepository;
pub use artworks::{ArtworkChanges, ArtworkFilter, ArtworkRepository, NewArtwork};
pub use collections::{CollectionChanges, CollectionRepository, NewCollection};
pub use exhibitions::{ExhibitionChanges, ExhibitionRepository, NewExhibition};
pub use pages::{NewPage, PageChanges, PageRepository};
pub use performances::{NewPerformance, PerformanceChanges, PerformanceRepository};

/// Combined repository access for the portfolio domain
#[derive(Clone)]
pub struct PortfolioRepositories {
    pub artworks: ArtworkRepository,
    pub pages: PageRepository,
    pub collections: CollectionRepository,
    pub exhibitions: ExhibitionRepository,
    pub performances: PerformanceRepository,
    pub analytics: AnalyticsRepository,
}

impl PortfolioRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            artworks: ArtworkRepository::new(pool.clone()),
            pages: PageRepository::new(pool.clone()),
            collections: CollectionRepository::new(pool.clone()),
            exhibitions: ExhibitionRepository::new(pool.clone()),
            performances: PerformanceRepository::new(pool.clone()),
            analytics: AnalyticsRepository::new(pool),
        }
    }
}

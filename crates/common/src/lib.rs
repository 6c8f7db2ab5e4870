//! Shared configuration, error handling, and request extractors for Folio
//!
//! - Configuration loaded from the environment (12-factor)
//! - The JSON error envelope every handler returns
//! - Repository error mapping
//! - Pagination and validated JSON extractors

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::{AnalyticsSettings, Config};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};

//! Domain types for the portfolio

pub mod analytics;
pub mod entities;

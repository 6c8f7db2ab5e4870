//! Content API integration tests against a real database
//!
//! Skipped unless `TEST_DATABASE_URL` is set.

#![allow(dead_code)]

mod common;
mod content;

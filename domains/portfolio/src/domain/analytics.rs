//! Internal analytics aggregates

use serde::{Deserialize, Serialize};

/// Number of paths reported in `topPaths`
pub const TOP_PATHS_LIMIT: i64 = 10;

/// Views recorded for one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathViews {
    pub path: String,
    pub views: i64,
}

/// First-party view counts for a period
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalSummary {
    pub total_views: i64,
    pub unique_paths: i64,
    pub top_paths: Vec<PathViews>,
}

/// Whether `path` may be recorded as a view: a local path of sane length
pub fn is_trackable_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && path.len() <= 512
        && !path.starts_with("/protected")
        && !path.chars().any(char::is_control)
}

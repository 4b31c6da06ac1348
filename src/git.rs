//! Git metadata collaborator contract.
//!
//! The engine never talks to git itself — a provider hands it per-path
//! activity data, and untracked paths simply return `None`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// How recently a file last changed, bucketed by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecencyBucket {
    /// No commit has ever touched this path.
    #[default]
    NoHistory,
    /// Last change outside the lookback window.
    Stale,
    /// Changed within the lookback window.
    Recent,
    /// Changed within the most recent slice of the window.
    Hot,
}

impl RecencyBucket {
    /// Multiplier applied to the commit-count boost.
    pub fn weight(self) -> f64 {
        match self {
            RecencyBucket::NoHistory => 0.0,
            RecencyBucket::Stale => 0.5,
            RecencyBucket::Recent => 1.0,
            RecencyBucket::Hot => 1.5,
        }
    }
}

/// Change activity for one path within the provider's lookback window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitActivity {
    pub commit_count: u32,
    pub recency: RecencyBucket,
    pub lines_added: u32,
    pub lines_deleted: u32,
}

/// Supplies per-path change activity, or `None` for untracked paths.
pub trait GitMetadataProvider: Sync {
    fn activity(&self, path: &Path) -> Option<GitActivity>;
}

/// Provider for repositories without history (or when git is unavailable).
/// Every path scores the neutral low.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGitMetadata;

impl GitMetadataProvider for NoGitMetadata {
    fn activity(&self, _path: &Path) -> Option<GitActivity> {
        None
    }
}

/// Map-backed provider, useful for tests and for callers that batch their
/// own git plumbing up front.
#[derive(Debug, Clone, Default)]
pub struct MapGitMetadata {
    activity: HashMap<PathBuf, GitActivity>,
}

impl MapGitMetadata {
    pub fn new(activity: HashMap<PathBuf, GitActivity>) -> Self {
        Self { activity }
    }

    pub fn insert(&mut self, path: PathBuf, activity: GitActivity) {
        self.activity.insert(path, activity);
    }
}

impl GitMetadataProvider for MapGitMetadata {
    fn activity(&self, path: &Path) -> Option<GitActivity> {
        self.activity.get(path).cloned()
    }
}

//! Error types for the strata engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can escape the engine. Per-file problems (parse failures,
/// unresolved references, cycles) never surface here — they degrade locally
/// and are reported as notices on the plan instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The scan was cancelled before completing. Partial graph and score
    /// state has been discarded.
    #[error("scan cancelled")]
    Cancelled,

    /// The catalog root could not be read at all.
    #[error("unreadable catalog root: {0}")]
    UnreadableRoot(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

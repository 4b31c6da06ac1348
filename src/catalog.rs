//! Source catalog: the engine's view of the candidate file set.
//!
//! The engine consumes a `SourceCatalog` that has already been filtered by
//! ignore/include rules and size caps. `scan_dir` is the bundled collaborator
//! that builds one from disk, walking with gitignore awareness.

use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extract::SupportedLanguage;

/// Files larger than this are dropped during discovery.
const MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;

/// One candidate file with its raw content and metadata.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    pub path: PathBuf,
    pub content: String,
    pub size: u64,
    /// Seconds since the epoch, when available.
    pub modified: Option<u64>,
    pub language: Option<SupportedLanguage>,
}

/// The complete candidate set for one scan. Order is irrelevant — the
/// orderer decides the final sequence.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    pub root: PathBuf,
    pub files: Vec<CatalogFile>,
}

impl SourceCatalog {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Build a catalog from all text files under a directory.
///
/// Respects .gitignore, walks recursively, skips oversized and non-UTF-8
/// (binary) files. Returns an error only when the root itself is unreadable.
pub fn scan_dir(root: &Path) -> Result<SourceCatalog> {
    if !root.exists() {
        return Err(Error::UnreadableRoot(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
    {
        let path = entry.into_path();
        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(_) => continue,
        };
        if metadata.len() > MAX_FILE_SIZE {
            debug!(path = %path.display(), size = metadata.len(), "skipping oversized file");
            continue;
        }
        // Binary files have no place in a text context artifact.
        let content = match fs::read(&path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => continue,
            },
            Err(_) => continue,
        };
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs());

        files.push(CatalogFile {
            language: SupportedLanguage::from_path(&path),
            size: metadata.len(),
            modified,
            content,
            path,
        });
    }

    debug!(count = files.len(), root = %root.display(), "catalog built");
    Ok(SourceCatalog {
        root: root.to_path_buf(),
        files,
    })
}

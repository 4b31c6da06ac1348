//! Cache collaborator: skips re-counting and re-compressing unchanged files.
//!
//! Keys combine a content hash with the engine configuration signature, so a
//! config change invalidates everything. The engine must behave identically
//! on a cold cache and on misses.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

/// (content hash, configuration hash) pair identifying a processing result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub content_hash: u64,
    pub config_hash: u64,
}

impl CacheKey {
    pub fn new(content: &str, config_hash: u64) -> Self {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        Self {
            content_hash: hasher.finish(),
            config_hash,
        }
    }
}

/// A previously computed per-file result.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub tokens: usize,
    pub compressed: Option<String>,
}

/// Storage seam for per-file processing results.
pub trait CacheProvider: Sync {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry>;
    fn put(&self, key: CacheKey, entry: CacheEntry);
}

/// In-memory cache, shared across a scan (and across scans if the caller
/// keeps it alive).
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheProvider for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: CacheKey, entry: CacheEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, entry);
        }
    }
}

/// Always misses. Cold-start behavior by construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl CacheProvider for NoCache {
    fn get(&self, _key: &CacheKey) -> Option<CacheEntry> {
        None
    }

    fn put(&self, _key: CacheKey, _entry: CacheEntry) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_cache_round_trip() {
        let cache = MemoryCache::new();
        let key = CacheKey::new("fn main() {}", 42);
        assert!(cache.get(&key).is_none());

        cache.put(
            key,
            CacheEntry {
                tokens: 3,
                compressed: None,
            },
        );
        let entry = cache.get(&key).expect("entry should be present");
        assert_eq!(entry.tokens, 3);
    }

    #[test]
    fn key_changes_with_content_and_config() {
        let a = CacheKey::new("alpha", 1);
        let b = CacheKey::new("beta", 1);
        let c = CacheKey::new("alpha", 2);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}

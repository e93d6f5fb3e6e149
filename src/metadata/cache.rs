//! Process-lifetime cache of catalog lookups.

use std::collections::HashMap;

use kourai_parser::MediaKind;
use parking_lot::RwLock;

/// Canonical record for a resolved title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    /// Canonical title (movie title or series name).
    pub title: String,
    /// Catalog id.
    pub id: u64,
    /// ISO-3166-1 origin country codes.
    pub countries: Vec<String>,
    /// Release or first-air year.
    pub year: Option<u16>,
}

/// Cache of lookups keyed by media kind and the raw, pre-resolution title.
///
/// Entries are never evicted or replaced. Concurrent lookups of the same
/// title may both reach the catalog; whichever result is stored first wins
/// and both callers get it back from [`LookupCache::insert`].
#[derive(Debug, Default)]
pub struct LookupCache {
    entries: RwLock<HashMap<(MediaKind, String), LookupResult>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result for `title`, if any.
    pub fn get(&self, kind: MediaKind, title: &str) -> Option<LookupResult> {
        self.entries
            .read()
            .get(&(kind, title.to_string()))
            .cloned()
    }

    /// Store `result` unless an entry already exists, and return the entry
    /// that is now cached.
    pub fn insert(&self, kind: MediaKind, title: &str, result: LookupResult) -> LookupResult {
        self.entries
            .write()
            .entry((kind, title.to_string()))
            .or_insert(result)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

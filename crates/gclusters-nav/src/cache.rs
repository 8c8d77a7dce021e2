//! Rendered page cache.
//!
//! One entry per (page, language). Entries are immutable once stored and
//! the cache is unbounded: the page set is small and fixed, so the only
//! way entries go away is a full [`PageCache::clear`] on language change.

use std::collections::HashMap;
use std::sync::Arc;

use gclusters_types::lang::Lang;
use gclusters_types::page::PageId;

use crate::content::PageContent;

/// Cache key: a page rendered in a language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub page: PageId,
    pub lang: Lang,
}

impl CacheKey {
    pub fn new(page: PageId, lang: Lang) -> Self {
        Self { page, lang }
    }
}

/// Write-once cache of rendered pages.
#[derive(Debug, Default)]
pub struct PageCache {
    entries: HashMap<CacheKey, Arc<PageContent>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached page.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<PageContent>> {
        self.entries.get(key).map(Arc::clone)
    }

    /// Store a page unless one is already cached under `key`.
    ///
    /// Returns the entry that is cached afterwards, which is the existing
    /// one when the key was already present.
    pub fn insert(&mut self, key: CacheKey, content: PageContent) -> Arc<PageContent> {
        Arc::clone(self.entries.entry(key).or_insert_with(|| Arc::new(content)))
    }

    /// Check whether `key` is present.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop all cached entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

//! Caching of per-path resolutions
//!
//! Resolution is pure, so a (path -> resolution) cache is sound as long as
//! the fragment set has not changed. The cache is guarded by the resolver's
//! fragment-set fingerprint: on mismatch every entry is dropped at once.
//! Entries are never invalidated individually.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::config::{Resolution, Resolver};
use crate::result::Result;

/// Concurrent cache of effective configurations keyed by normalized path
pub struct ResolutionCache {
    entries: DashMap<String, Arc<Resolution>>,
    fingerprint: AtomicU64,
}

impl ResolutionCache {
    pub fn new(fingerprint: u64) -> Self {
        Self {
            entries: DashMap::new(),
            fingerprint: AtomicU64::new(fingerprint),
        }
    }

    /// Build a cache keyed to a resolver's current fragment set
    pub fn for_resolver(resolver: &Resolver) -> Self {
        Self::new(resolver.fingerprint())
    }

    /// Resolve through the cache.
    ///
    /// If the resolver's fingerprint no longer matches the cache, all
    /// entries are invalidated wholesale before the lookup.
    pub fn resolve(&self, resolver: &Resolver, path: &str) -> Result<Arc<Resolution>> {
        let current = resolver.fingerprint();
        if self.fingerprint.swap(current, Ordering::AcqRel) != current {
            tracing::debug!("fragment set changed, clearing resolution cache");
            self.entries.clear();
        }

        if let Some(hit) = self.entries.get(path) {
            return Ok(Arc::clone(&hit));
        }

        let resolution = Arc::new(resolver.resolve(path)?);
        self.entries
            .insert(path.to_string(), Arc::clone(&resolution));
        Ok(resolution)
    }

    pub fn get(&self, path: &str) -> Option<Arc<Resolution>> {
        self.entries.get(path).map(|entry| Arc::clone(&entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

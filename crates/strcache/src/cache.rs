//! SharedCache: an LruCache behind a lock, with hit/miss statistics

use std::io;

use parking_lot::RwLock;
use strindex::Result;

use crate::lru::{Insertion, LruCache};
use crate::stats::CacheStats;

/// Thread-safe LRU cache
///
/// Every operation holds the lock for its whole duration, so concurrent
/// callers observe the same sequence of states a single thread would.
/// Lookups that promote an entry need the write lock; `peek`, `contains`,
/// `len` and traversal share the read lock.
pub struct SharedCache<V> {
    /// LRU engine
    cache: RwLock<LruCache<V>>,

    /// Cache statistics
    stats: CacheStats,
}

impl<V> SharedCache<V> {
    /// Create a new shared cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, at least 1
    ///
    /// # Returns
    /// * `Result<SharedCache<V>>` - Empty cache, or the construction error of [`LruCache::new`]
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from_cache(LruCache::new(capacity)?))
    }

    /// Wrap an existing cache, starting with zeroed statistics
    pub fn from_cache(cache: LruCache<V>) -> Self {
        Self {
            cache: RwLock::new(cache),
            stats: CacheStats::new(),
        }
    }

    /// Insert `key` if absent, or refresh its recency if present
    ///
    /// See [`LruCache::insert`].
    pub fn insert(&self, key: &str, value: V) -> Result<Insertion<V>> {
        let outcome = self.cache.write().insert(key, value)?;

        match &outcome {
            Insertion::Inserted => self.stats.record_insert(),
            Insertion::Evicted { .. } => {
                self.stats.record_insert();
                self.stats.record_eviction();
            }
            Insertion::Refreshed(_) => self.stats.record_refresh(),
        }

        Ok(outcome)
    }

    /// Look up `key`, marking it most recently used on a hit
    ///
    /// # Returns
    /// * `Option<V>` - A clone of the cached value
    pub fn find(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let mut cache = self.cache.write();
        match cache.find(key) {
            Some(value) => {
                self.stats.record_hit();
                Some(value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Look up `key` without touching recency or statistics
    pub fn peek(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.cache.read().peek(key).cloned()
    }

    /// Check if `key` is cached
    pub fn contains(&self, key: &str) -> bool {
        self.cache.read().contains(key)
    }

    /// Replace the value of a cached key; see [`LruCache::update`]
    pub fn update(&self, key: &str, value: V) -> Result<Option<V>> {
        self.cache.write().update(key, value)
    }

    /// Remove `key` from the cache
    pub fn remove(&self, key: &str) -> Option<V> {
        self.cache.write().remove(key)
    }

    /// Get current number of entries
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.read().capacity()
    }

    /// Visit every entry from most to least recently used
    pub fn for_each<F>(&self, visitor: F)
    where
        F: FnMut(&str, &V),
    {
        self.cache.read().for_each(visitor);
    }

    /// Write every entry through `item_print`; see [`LruCache::print`]
    pub fn print<W, F>(&self, out: &mut W, item_print: F) -> io::Result<()>
    where
        W: io::Write,
        F: FnMut(&mut W, &str, &V) -> io::Result<()>,
    {
        self.cache.read().print(out, item_print)
    }

    /// Clear the cache and reset statistics
    pub fn clear(&self) {
        self.cache.write().clear();
        self.stats.reset();
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Unwrap the inner cache
    pub fn into_inner(self) -> LruCache<V> {
        self.cache.into_inner()
    }
}

//! LRU (Least Recently Used) cache implementation
//!
//! A `HashIndex` maps each key to the `EntryId` of its entry in the
//! `RecencyList`. Every mutating operation updates both, so a key is present
//! in one iff it is present in the other.

use std::fmt;
use std::io;
use std::mem;

use strindex::{Error, HashIndex, Result};
use tracing::{debug, trace};

use crate::list::{EntryId, Iter, RecencyList};

/// Outcome of [`LruCache::insert`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion<V> {
    /// New entry stored; the cache had room
    Inserted,

    /// New entry stored after evicting the least recently used one
    Evicted {
        /// Key of the evicted entry
        key: String,
        /// Value of the evicted entry, handed back to the caller
        value: V,
    },

    /// Key was already cached: recency refreshed, stored value kept.
    /// Holds the value passed to `insert`, which was not stored.
    Refreshed(V),
}

impl<V> Insertion<V> {
    /// True if a new entry was stored
    pub fn is_new(&self) -> bool {
        !matches!(self, Insertion::Refreshed(_))
    }

    /// The evicted pair, if the insertion evicted one
    pub fn into_evicted(self) -> Option<(String, V)> {
        match self {
            Insertion::Evicted { key, value } => Some((key, value)),
            _ => None,
        }
    }
}

/// Fixed-capacity LRU cache keyed by strings
///
/// Not synchronized: every mutation takes `&mut self`. Use
/// [`SharedCache`](crate::SharedCache) to share one between threads.
pub struct LruCache<V> {
    index: HashIndex<EntryId>,
    list: RecencyList<V>,
    capacity: usize,
}

impl<V> LruCache<V> {
    /// Create a new LRU cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, at least 1
    ///
    /// # Returns
    /// * `Result<LruCache<V>>` - Empty cache, `Error::InvalidCapacity` for 0,
    ///   or `Error::Alloc` if the index or entry arena could not be allocated
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        let index = HashIndex::new(capacity)?;
        let list = RecencyList::with_slots(capacity)?;
        debug!(capacity, slots = index.slot_count(), "created lru cache");

        Ok(Self {
            index,
            list,
            capacity,
        })
    }

    /// Insert `key` if absent, or refresh its recency if present
    ///
    /// An existing value is never overwritten: the given value comes back in
    /// [`Insertion::Refreshed`]. Use [`update`](Self::update) to replace it.
    /// When the cache is full the least recently used entry is evicted and
    /// returned in [`Insertion::Evicted`].
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - `key` is empty
    /// * `Error::Alloc` - room for the new entry could not be reserved; the
    ///   cache is left unchanged
    pub fn insert(&mut self, key: &str, value: V) -> Result<Insertion<V>> {
        if key.is_empty() {
            return Err(Error::InvalidArgument("empty key"));
        }

        if let Some(&id) = self.index.find(key) {
            self.list.promote(id);
            return Ok(Insertion::Refreshed(value));
        }

        // Everything fallible happens before the first mutation
        let entry_key = copy_key(key)?;
        let index_key = copy_key(key)?;
        self.index.reserve(key)?;
        self.list.reserve()?;

        let outcome = if self.list.len() >= self.capacity {
            match self.evict_lru() {
                Some((victim, value)) => Insertion::Evicted { key: victim, value },
                None => Insertion::Inserted,
            }
        } else {
            Insertion::Inserted
        };

        let id = self.list.alloc(entry_key, value);
        self.list.push_front(id);
        // Room was reserved above
        self.index.insert(index_key, id)?;

        Ok(outcome)
    }

    /// Look up `key`, marking it most recently used on a hit
    pub fn find(&mut self, key: &str) -> Option<&V> {
        if key.is_empty() {
            return None;
        }

        let id = *self.index.find(key)?;
        self.list.promote(id);
        Some(self.list.value(id))
    }

    /// Look up `key` without touching recency
    pub fn peek(&self, key: &str) -> Option<&V> {
        let id = *self.index.find(key)?;
        Some(self.list.value(id))
    }

    /// Check if `key` is cached, without touching recency
    pub fn contains(&self, key: &str) -> bool {
        self.index.find(key).is_some()
    }

    /// Replace the value of a cached key and mark it most recently used
    ///
    /// # Returns
    /// * `Ok(Some(old))` - the replaced value
    /// * `Ok(None)` - `key` is not cached; nothing is inserted and `value` is dropped
    pub fn update(&mut self, key: &str, value: V) -> Result<Option<V>> {
        if key.is_empty() {
            return Err(Error::InvalidArgument("empty key"));
        }

        let Some(&id) = self.index.find(key) else {
            return Ok(None);
        };
        self.list.promote(id);
        Ok(Some(mem::replace(self.list.value_mut(id), value)))
    }

    /// Remove `key` from the cache
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let id = self.index.remove(key)?;
        self.list.detach(id);
        let (_, value) = self.list.release(id);
        Some(value)
    }

    /// Key of the most recently used entry
    pub fn mru_key(&self) -> Option<&str> {
        self.list.head().map(|id| self.list.key(id))
    }

    /// Key of the least recently used entry (the next victim)
    pub fn lru_key(&self) -> Option<&str> {
        self.list.tail().map(|id| self.list.key(id))
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    /// Get the fixed capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate from most to least recently used without touching recency
    pub fn iter(&self) -> Iter<'_, V> {
        self.list.iter()
    }

    /// Visit every entry from most to least recently used
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&str, &V),
    {
        for (key, value) in self.list.iter() {
            visitor(key, value);
        }
    }

    /// Write every entry through `item_print`, most recently used first
    pub fn print<W, F>(&self, out: &mut W, mut item_print: F) -> io::Result<()>
    where
        W: io::Write,
        F: FnMut(&mut W, &str, &V) -> io::Result<()>,
    {
        for (key, value) in self.list.iter() {
            item_print(out, key, value)?;
        }
        Ok(())
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Tear the cache down, handing each value to `destructor` exactly once
    ///
    /// Values are visited from most to least recently used. Dropping the
    /// cache instead is the same teardown without a destructor.
    pub fn destroy<F: FnMut(V)>(self, mut destructor: F) {
        let LruCache {
            index, mut list, ..
        } = self;
        let count = list.len();

        while let Some(id) = list.head() {
            list.detach(id);
            let (_, value) = list.release(id);
            destructor(value);
        }
        drop(index);

        debug!(count, "destroyed lru cache");
    }

    fn evict_lru(&mut self) -> Option<(String, V)> {
        let victim = self.list.tail()?;
        self.index.remove(self.list.key(victim));
        self.list.detach(victim);
        let (key, value) = self.list.release(victim);
        trace!(key = %key, "evicted least recently used entry");
        Some((key, value))
    }
}

impl<V: fmt::Debug> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a LruCache<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn copy_key(key: &str) -> Result<String> {
    let mut owned = String::new();
    owned.try_reserve_exact(key.len())?;
    owned.push_str(key);
    Ok(owned)
}

//! # strcache
//!
//! Fixed-capacity LRU cache keyed by strings.
//!
//! ## Architecture
//! - **HashIndex** (from `strindex`): key → entry id lookup (O(1))
//! - **RecencyList**: arena-backed doubly-linked list, head = most recently used (O(1) promote/evict)
//! - **LruCache**: keeps both in step on every insert, find, update and removal
//! - **SharedCache**: `RwLock` wrapper with hit/miss statistics for multi-threaded callers
//!
//! Inserting an existing key only refreshes its recency; the stored value
//! is replaced only through `update`. Values are owned by the cache while
//! stored and handed back on eviction, removal and teardown.
//!
//! ```
//! use strcache::{Insertion, LruCache};
//!
//! let mut cache = LruCache::new(2)?;
//! cache.insert("a", 1)?;
//! cache.insert("b", 2)?;
//! assert_eq!(cache.find("a"), Some(&1));
//!
//! // "b" is now least recently used
//! let outcome = cache.insert("c", 3)?;
//! assert_eq!(outcome, Insertion::Evicted { key: "b".to_string(), value: 2 });
//! # Ok::<(), strcache::Error>(())
//! ```

#![warn(missing_docs)]

mod cache;
mod list;
mod lru;
mod stats;

pub use cache::SharedCache;
pub use list::Iter;
pub use lru::{Insertion, LruCache};
pub use stats::CacheStats;
pub use strindex::{Error, Result};

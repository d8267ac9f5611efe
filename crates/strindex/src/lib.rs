//! # strindex
//!
//! Hash index over string keys used by the strcache LRU engine.
//!
//! ## Layout
//! - **HashIndex**: fixed array of slots, sized once from a hint
//! - **BucketChain**: per-slot collision list, insertion ordered
//! - **slot_of**: deterministic key → slot mapping (fixed-seed AHash)
//!
//! Unlike a plain insert/find table, the index supports `remove(key)`,
//! which only rewrites the chain of the key's own slot.

#![warn(missing_docs)]

mod chain;
mod error;
mod index;

pub use chain::BucketChain;
pub use error::{Error, Result};
pub use index::{slot_of, HashIndex};

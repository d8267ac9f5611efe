//! Bucket chain: the collision list behind one index slot

use crate::error::Result;

/// Unordered list of (key, value) pairs sharing one slot
///
/// Pairs are kept in insertion order. Duplicate keys are not checked;
/// the owner of the index guarantees uniqueness.
#[derive(Debug, Clone)]
pub struct BucketChain<T> {
    pairs: Vec<(String, T)>,
}

impl<T> BucketChain<T> {
    /// Create an empty chain (does not allocate)
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Reserve room for `additional` more pairs
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.pairs.try_reserve(additional)?;
        Ok(())
    }

    /// Append a pair without checking for an existing key
    ///
    /// Cannot fail if room was reserved beforehand.
    pub fn insert(&mut self, key: String, value: T) -> Result<()> {
        self.pairs.try_reserve(1)?;
        self.pairs.push((key, value));
        Ok(())
    }

    /// Find the value stored under `key`
    pub fn find(&self, key: &str) -> Option<&T> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Find the value stored under `key` for mutation
    pub fn find_mut(&mut self, key: &str) -> Option<&mut T> {
        self.pairs
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Remove the first pair stored under `key`
    ///
    /// The remaining pairs keep their relative order.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        let pos = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(pos).1)
    }

    /// Forward traversal over the stored pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of pairs in the chain
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Drop every pair, keeping the allocation
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Consume the chain, handing every value to `destructor`
    pub fn destroy<F: FnMut(T)>(self, mut destructor: F) {
        for (_, value) in self.pairs {
            destructor(value);
        }
    }
}

impl<T> Default for BucketChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

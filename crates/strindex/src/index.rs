//! Hash index: a fixed array of bucket chains addressed by `slot_of`
//!
//! The slot count is chosen once at construction from a size hint and never
//! changes, so a key always lives in the chain `slot_of(key, slot_count)`.

use std::hash::BuildHasher;

use ahash::RandomState;

use crate::chain::BucketChain;
use crate::error::Result;

/// Fixed seeds so slot placement is a pure function of the key
const SLOT_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Map a key to a slot index in `0..slot_count`
///
/// Deterministic for the lifetime of the process. This is the same function
/// the index uses for `insert`, `find` and `remove`.
///
/// # Panics
/// Panics if `slot_count` is zero.
pub fn slot_of(key: &str, slot_count: usize) -> usize {
    assert!(slot_count > 0, "slot_count must be greater than 0");

    let [k0, k1, k2, k3] = SLOT_SEEDS;
    let hasher = RandomState::with_seeds(k0, k1, k2, k3);
    (BuildHasher::hash_one(&hasher, key) % slot_count as u64) as usize
}

/// String-keyed hash index with one bucket chain per slot
#[derive(Debug, Clone)]
pub struct HashIndex<T> {
    slots: Vec<BucketChain<T>>,
    len: usize,
}

impl<T> HashIndex<T> {
    /// Create an index sized for roughly `size_hint` keys
    ///
    /// # Arguments
    /// * `size_hint` - Expected number of keys; one slot is allocated per key (min 1)
    ///
    /// # Returns
    /// * `Result<HashIndex<T>>` - Empty index, or `Error::Alloc` if the slot array could not be allocated
    pub fn new(size_hint: usize) -> Result<Self> {
        let slot_count = size_hint.max(1);
        let mut slots = Vec::new();
        slots.try_reserve_exact(slot_count)?;
        slots.resize_with(slot_count, BucketChain::new);

        Ok(Self { slots, len: 0 })
    }

    /// Number of slots (fixed at construction)
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Look up the value stored under `key`
    pub fn find(&self, key: &str) -> Option<&T> {
        self.slots[self.slot(key)].find(key)
    }

    /// Look up the value stored under `key` for mutation
    pub fn find_mut(&mut self, key: &str) -> Option<&mut T> {
        let slot = self.slot(key);
        self.slots[slot].find_mut(key)
    }

    /// Reserve room in `key`'s chain so the next `insert` of that key cannot fail
    pub fn reserve(&mut self, key: &str) -> Result<()> {
        let slot = self.slot(key);
        self.slots[slot].reserve(1)
    }

    /// Insert a pair without checking for duplicates
    ///
    /// The caller guarantees `key` is not already present.
    pub fn insert(&mut self, key: String, value: T) -> Result<()> {
        let slot = self.slot(&key);
        self.slots[slot].insert(key, value)?;
        self.len += 1;
        Ok(())
    }

    /// Remove `key`, touching only the chain of its slot
    pub fn remove(&mut self, key: &str) -> Option<T> {
        let slot = self.slot(key);
        let value = self.slots[slot].remove(key)?;
        self.len -= 1;
        Some(value)
    }

    /// Read-only view of one slot's chain
    pub fn bucket(&self, slot: usize) -> Option<&BucketChain<T>> {
        self.slots.get(slot)
    }

    /// Iterate over every stored pair, slot by slot
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.slots.iter().flat_map(|chain| chain.iter())
    }

    /// Remove every pair, keeping the slot array
    pub fn clear(&mut self) {
        for chain in &mut self.slots {
            chain.clear();
        }
        self.len = 0;
    }

    /// Consume the index, handing every stored value to `destructor`
    pub fn destroy<F: FnMut(T)>(self, mut destructor: F) {
        for chain in self.slots {
            chain.destroy(&mut destructor);
        }
    }

    fn slot(&self, key: &str) -> usize {
        slot_of(key, self.slots.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_of_deterministic() {
        for key in ["", "a", "hello", "a much longer key with spaces"] {
            let slot = slot_of(key, 17);
            assert!(slot < 17);
            assert_eq!(slot, slot_of(key, 17));
        }
        assert_eq!(slot_of("anything", 1), 0);
    }

    #[test]
    fn test_index_new_min_one_slot() {
        let index: HashIndex<u32> = HashIndex::new(0).unwrap();
        assert_eq!(index.slot_count(), 1);
        assert!(index.is_empty());
    }

    #[test]
    fn test_index_insert_find() {
        let mut index = HashIndex::new(4).unwrap();
        index.insert("one".to_string(), 1).unwrap();
        index.insert("two".to_string(), 2).unwrap();

        assert_eq!(index.find("one"), Some(&1));
        assert_eq!(index.find("two"), Some(&2));
        assert_eq!(index.find("three"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_index_key_lands_in_its_slot() {
        let mut index = HashIndex::new(8).unwrap();
        index.insert("needle".to_string(), ()).unwrap();

        let slot = slot_of("needle", index.slot_count());
        let bucket = index.bucket(slot).unwrap();
        assert_eq!(bucket.find("needle"), Some(&()));
    }

    #[test]
    fn test_index_remove_only_touches_one_key() {
        // A single slot forces every key into the same chain
        let mut index = HashIndex::new(1).unwrap();
        for (i, key) in ["a", "b", "c", "d"].iter().enumerate() {
            index.insert(key.to_string(), i).unwrap();
        }

        assert_eq!(index.remove("b"), Some(1));
        assert_eq!(index.remove("b"), None);
        assert_eq!(index.len(), 3);

        let order: Vec<_> = index.bucket(0).unwrap().iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(order, vec![("a", 0), ("c", 2), ("d", 3)]);
    }

    #[test]
    fn test_index_find_mut() {
        let mut index = HashIndex::new(2).unwrap();
        index.insert("k".to_string(), 1).unwrap();
        *index.find_mut("k").unwrap() += 10;

        assert_eq!(index.find("k"), Some(&11));
    }

    #[test]
    fn test_index_clear_and_destroy() {
        let mut index = HashIndex::new(3).unwrap();
        for i in 0..10 {
            index.insert(format!("key{}", i), i).unwrap();
        }
        assert_eq!(index.iter().count(), 10);

        let mut total = 0;
        index.clone().destroy(|v| total += v);
        assert_eq!(total, 45);

        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.find("key3"), None);
    }
}

//! HashMap-backed computed table.
//!
//! No collisions, so every result computed during a game stays available
//! until the next [`clear`](HashMapCache::clear). The cost is memory that
//! grows with the number of distinct operations.

use std::collections::HashMap;
use std::hash::Hash;

/// A cache backed by [HashMap], counting lookups.
pub struct HashMapCache<K, V> {
    map: HashMap<K, V>,
    hits: usize,
    misses: usize,
}

impl<K, V> HashMapCache<K, V> {
    /// Creates a cache with room for `2^bits` entries before it reallocates.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Cache bits must be in range 0..=31, got {}", bits);
        Self {
            map: HashMap::with_capacity(1 << bits),
            hits: 0,
            misses: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Fraction of lookups answered from the table, `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Drops all entries. Hit and miss counters are kept.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, V> HashMapCache<K, V>
where
    K: Hash + Eq,
    V: Copy,
{
    #[inline]
    pub fn get(&mut self, key: &K) -> Option<V> {
        let found = self.map.get(key).copied();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    #[inline]
    pub fn insert(&mut self, key: K, value: V) {
        self.map.insert(key, value);
    }
}

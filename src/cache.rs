//! Memoization for repeated identical queries.
//!
//! Entries expire after a fixed time-to-live. When full, the oldest entry is
//! evicted first. `clear()` drops everything.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::trace;

struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

pub struct QueryCache<K, V> {
    ttl: Duration,
    max_entries: usize,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        self.evict_expired();
        let hit = self.entries.get(key).map(|e| e.value.clone());
        trace!("cache {} for {:?}", if hit.is_some() { "hit" } else { "miss" }, key);
        hit
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.evict_expired();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            if let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.created_at)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, e| e.created_at.elapsed() <= ttl);
    }
}

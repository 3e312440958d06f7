// Recency Cache - Bounded LRU Store for Rendering Results
//
// Maps a cache key (normalized fragment + scoring configuration) to a shared
// result. Every read, insert, eviction and statistics update happens under a
// single mutex, so no caller can observe an entry evicted without its
// replacement inserted, or a half-updated hit/miss count. Recency is a
// monotonically increasing stamp; the oldest stamp is evicted first.

mod key;

pub use key::{
    KEY_SEPARATOR, SUPPRESS_IMAGE_ABOVE, SUPPRESS_TEXT_BELOW, ScoringConfiguration, cache_key,
};

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Default number of entries kept by a renderer's cache
pub const DEFAULT_CAPACITY: usize = 1000;

/// Snapshot of cache occupancy and effectiveness
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub total_requests: u64,
    /// `hits / total_requests`, or 0 before any request
    pub hit_rate: f64,
}

#[derive(Debug)]
struct CacheState<V> {
    /// Value and recency stamp per key
    entries: HashMap<String, (V, u64)>,
    /// Keys by recency stamp, least recently used first
    order: BTreeMap<u64, String>,
    next_stamp: u64,
    hits: u64,
    misses: u64,
}

impl<V: Clone> CacheState<V> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            order: BTreeMap::new(),
            next_stamp: 0,
            hits: 0,
            misses: 0,
        }
    }

    fn stamp(&mut self) -> u64 {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        stamp
    }

    /// Clone the value for `key` and mark it most recently used
    fn touch(&mut self, key: &str) -> Option<V> {
        let stamp = self.stamp();
        let (value, old) = self.entries.get_mut(key)?;
        let previous = std::mem::replace(old, stamp);
        let value = value.clone();
        if let Some(k) = self.order.remove(&previous) {
            self.order.insert(stamp, k);
        }
        Some(value)
    }

    fn insert(&mut self, key: String, value: V, capacity: usize) {
        if capacity == 0 {
            return;
        }
        let stamp = self.stamp();
        if let Some((slot, old)) = self.entries.get_mut(&key) {
            *slot = value;
            let previous = std::mem::replace(old, stamp);
            self.order.remove(&previous);
            self.order.insert(stamp, key);
            return;
        }
        if self.entries.len() >= capacity
            && let Some((_, evicted)) = self.order.pop_first()
        {
            self.entries.remove(&evicted);
            trace!(key = %evicted.escape_debug(), "evicted least recently used entry");
        }
        self.order.insert(stamp, key.clone());
        self.entries.insert(key, (value, stamp));
    }

    fn record(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }
}

/// Bounded least-recently-used cache with hit/miss accounting
///
/// Capacity is fixed at construction. Values are handed out by clone, so
/// they are usually `Arc`s that are never mutated after insertion.
#[derive(Debug)]
pub struct RecencyCache<V> {
    capacity: usize,
    state: Mutex<CacheState<V>>,
}

impl<V: Clone> RecencyCache<V> {
    /// Create a cache holding at most `capacity` entries
    ///
    /// A capacity of zero yields a cache that stores nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState::new(capacity)),
        }
    }

    /// Look up `key`, marking it most recently used if present
    pub fn get(&self, key: &str) -> Option<V> {
        self.state.lock().touch(key)
    }

    /// Insert or overwrite `key`, evicting the least recently used entry
    /// first when a new key arrives at capacity
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.state.lock().insert(key.into(), value, self.capacity);
    }

    /// Look up `key`, computing and storing the value on a miss, and record
    /// the access. Returns the value and whether it was a hit.
    ///
    /// `compute` runs without the lock held, so hits on other keys are never
    /// blocked behind it. If another caller stored `key` in the meantime,
    /// that value is kept and returned.
    pub fn get_or_insert_with<F>(&self, key: &str, compute: F) -> (V, bool)
    where
        F: FnOnce() -> V,
    {
        {
            let mut state = self.state.lock();
            if let Some(value) = state.touch(key) {
                state.record(true);
                trace!(key = %key.escape_debug(), "cache hit");
                return (value, true);
            }
        }

        let computed = compute();

        let mut state = self.state.lock();
        state.record(false);
        trace!(key = %key.escape_debug(), "cache miss");
        if let Some(existing) = state.touch(key) {
            return (existing, false);
        }
        state.insert(key.to_string(), computed.clone(), self.capacity);
        (computed, false)
    }

    /// Whether `key` is present, without touching its recency
    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    /// Remove every entry and reset the hit/miss counters
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.order.clear();
        state.hits = 0;
        state.misses = 0;
    }

    /// Count one lookup as a hit or a miss
    pub fn record_access(&self, hit: bool) {
        self.state.lock().record(hit);
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current occupancy and hit statistics
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let total_requests = state.hits + state.misses;
        let hit_rate = if total_requests == 0 {
            0.0
        } else {
            state.hits as f64 / total_requests as f64
        };
        CacheStats {
            size: state.entries.len(),
            capacity: self.capacity,
            hits: state.hits,
            misses: state.misses,
            total_requests,
            hit_rate,
        }
    }
}

impl<V: Clone> Default for RecencyCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

//! Bounded lookup result cache.
//!
//! The cache never evicts single entries. When an insert would push it past
//! its capacity the whole map is dropped and the insert goes into the fresh,
//! empty map. A capacity of zero disables caching.

use std::collections::HashMap;

use metrics::counter;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::backend::BackendId;

/// Default number of cached lookups.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Number of wholesale clears caused by overflow.
    pub clears: u64,
}

/// Results keyed by lookup key, then by walk count, so lookups borrow the key.
#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, HashMap<usize, Vec<BackendId>>>,
    /// Number of `(key, count)` results across all keys.
    len: usize,
    stats: CacheStats,
}

impl CacheState {
    fn contains(&self, key: &str, count: usize) -> bool {
        self.entries
            .get(key)
            .is_some_and(|by_count| by_count.contains_key(&count))
    }
}

/// Memo of `(key, count)` -> lookup result.
///
/// Interior mutability through a mutex lets lookups take `&self` and keeps the
/// owner `Send + Sync`.
#[derive(Debug)]
pub struct ResultCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl ResultCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    pub fn get(&self, key: &str, count: usize) -> Option<Vec<BackendId>> {
        if !self.is_enabled() {
            return None;
        }

        let mut state = self.state.lock();
        let cached = state
            .entries
            .get(key)
            .and_then(|by_count| by_count.get(&count))
            .cloned();
        match cached {
            Some(result) => {
                state.stats.hits += 1;
                counter!("distrib_cache_hits_total").increment(1);
                trace!(key, count, "cache hit");
                Some(result)
            }
            None => {
                state.stats.misses += 1;
                counter!("distrib_cache_misses_total").increment(1);
                None
            }
        }
    }

    pub fn put(&self, key: &str, count: usize, result: Vec<BackendId>) {
        if !self.is_enabled() {
            return;
        }

        let mut guard = self.state.lock();
        let state = &mut *guard;
        if state.len >= self.capacity && !state.contains(key, count) {
            debug!(entries = state.len, capacity = self.capacity, "clearing result cache");
            state.entries = HashMap::new();
            state.len = 0;
            state.stats.clears += 1;
            counter!("distrib_cache_clears_total").increment(1);
        }

        let added = match state.entries.get_mut(key) {
            Some(by_count) => by_count.insert(count, result).is_none(),
            None => {
                state
                    .entries
                    .insert(key.to_owned(), HashMap::from([(count, result)]));
                true
            }
        };
        if added {
            state.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached result. Counters are kept.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.len = 0;
    }

    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }
}

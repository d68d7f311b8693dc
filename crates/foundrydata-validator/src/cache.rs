//! A small process-wide LRU cache of compiled validators, bounded by
//! [`MAX_VALIDATOR_CACHE_ENTRIES`] and guarded by a mutex so concurrent
//! pipeline runs may share it safely (§3: "the validator LRU cache is
//! the single process-wide resource...shared only the validator cache").

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use jsonschema::Validator;

use crate::key::ValidatorCacheKey;

pub const MAX_VALIDATOR_CACHE_ENTRIES: usize = 64;

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, Arc<Validator>>,
    /// Recency order, most-recently-used at the back. A key may appear
    /// more than once; staleness is resolved by checking `entries` on pop.
    recency: VecDeque<String>,
}

/// Bounded LRU cache over compiled [`Validator`]s, keyed by
/// [`ValidatorCacheKey::as_cache_string`].
pub struct ValidatorCache {
    state: Mutex<CacheState>,
    capacity: usize,
}

impl Default for ValidatorCache {
    fn default() -> Self {
        Self::new(MAX_VALIDATOR_CACHE_ENTRIES)
    }
}

impl ValidatorCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            capacity: capacity.max(1),
        }
    }

    #[must_use]
    pub fn get(&self, key: &ValidatorCacheKey) -> Option<Arc<Validator>> {
        let cache_key = key.as_cache_string();
        let mut state = self.state.lock().expect("validator cache mutex poisoned");
        let hit = state.entries.get(&cache_key).cloned();
        if hit.is_some() {
            state.recency.push_back(cache_key);
        }
        hit
    }

    pub fn insert(&self, key: &ValidatorCacheKey, validator: Arc<Validator>) {
        let cache_key = key.as_cache_string();
        let mut state = self.state.lock().expect("validator cache mutex poisoned");
        state.entries.insert(cache_key.clone(), validator);
        state.recency.push_back(cache_key);

        while state.entries.len() > self.capacity {
            let Some(stale) = pop_least_recently_used(&mut state) else {
                break;
            };
            state.entries.remove(&stale);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().expect("validator cache mutex poisoned").entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pop entries off the front of the recency queue until one still names a
/// live entry (earlier duplicates from repeated `get`s are stale noise).
fn pop_least_recently_used(state: &mut CacheState) -> Option<String> {
    while let Some(candidate) = state.recency.pop_front() {
        if state.entries.contains_key(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(tag: &str) -> ValidatorCacheKey {
        ValidatorCacheKey::new(&json!({"type": "object", "title": tag}), &[], "sub", "0")
    }

    fn dummy_validator() -> Arc<Validator> {
        Arc::new(jsonschema::validator_for(&json!({})).expect("trivial schema compiles"))
    }

    #[test]
    fn hit_after_insert() {
        let cache = ValidatorCache::new(4);
        let k = key("a");
        cache.insert(&k, dummy_validator());
        assert!(cache.get(&k).is_some());
    }

    #[test]
    fn evicts_least_recently_used_when_over_capacity() {
        let cache = ValidatorCache::new(2);
        let a = key("a");
        let b = key("b");
        let c = key("c");
        cache.insert(&a, dummy_validator());
        cache.insert(&b, dummy_validator());
        // touch `a` so `b` becomes the least recently used entry
        assert!(cache.get(&a).is_some());
        cache.insert(&c, dummy_validator());

        assert!(cache.get(&a).is_some());
        assert!(cache.get(&b).is_none());
        assert!(cache.get(&c).is_some());
        assert_eq!(cache.len(), 2);
    }
}

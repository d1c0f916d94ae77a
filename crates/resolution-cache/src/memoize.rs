use crate::clock::{Clock, SystemClock};
use crate::config::MemoizeConfig;
use crate::stats::{CacheStats, Counters};
use jiff::{SignedDuration, Timestamp};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

#[derive(Debug)]
struct Entry<V> {
    value: V,
    created_at: Timestamp,
}

enum Lookup<V> {
    Fresh(V),
    Stale,
    Missing,
}

/// A memo table for an idempotent lookup, keyed by the lookup's arguments.
///
/// The wrapped lookup is passed at each call site, either as a plain closure
/// ([`call`](Self::call)) or as a closure returning a future
/// ([`call_async`](Self::call_async)). The table lock is only held between
/// suspension points, so two callers racing on the same stale key may both
/// recompute it; the last write wins.
#[derive(Debug)]
pub struct MemoizedCache<K, V, C = SystemClock> {
    table: Mutex<HashMap<K, Entry<V>>>,
    max_items: usize,
    ttl: SignedDuration,
    clock: C,
    counters: Counters,
}

impl<K, V> MemoizedCache<K, V, SystemClock>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(config: &MemoizeConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<K, V, C> MemoizedCache<K, V, C>
where
    K: Eq + Hash,
    V: Clone,
    C: Clock,
{
    pub fn with_clock(config: &MemoizeConfig, clock: C) -> Self {
        Self {
            table: Mutex::new(HashMap::new()),
            max_items: config.max_items,
            ttl: SignedDuration::try_from(config.ttl).unwrap_or(SignedDuration::MAX),
            clock,
            counters: Counters::default(),
        }
    }

    /// Returns the memoized value for `key`, computing it with `f` on a miss
    /// or once the entry is older than the TTL.
    pub fn call<F>(&self, key: K, f: F) -> V
    where
        F: FnOnce(&K) -> V,
    {
        if let Lookup::Fresh(value) = self.lookup(&key) {
            return value;
        }
        let value = f(&key);
        self.store(key, value.clone());
        value
    }

    /// Like [`call`](Self::call) for a suspending lookup.
    ///
    /// Errors are handed back to the caller and never stored.
    pub async fn call_async<F, Fut, E>(&self, key: K, f: F) -> Result<V, E>
    where
        K: Clone,
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Lookup::Fresh(value) = self.lookup(&key) {
            return Ok(value);
        }
        let value = f(key.clone()).await?;
        self.store(key, value.clone());
        Ok(value)
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.table.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    fn lookup(&self, key: &K) -> Lookup<V> {
        let mut table = self.table.lock();
        if table.len() > self.max_items {
            table.clear();
            self.counters.clearout();
        }

        match table.get(key) {
            None => {
                self.counters.miss();
                Lookup::Missing
            }
            Some(entry) if self.clock.now().duration_since(entry.created_at) > self.ttl => {
                self.counters.refresh();
                Lookup::Stale
            }
            Some(entry) => {
                self.counters.hit();
                Lookup::Fresh(entry.value.clone())
            }
        }
    }

    fn store(&self, key: K, value: V) {
        let created_at = self.clock.now();
        self.table.lock().insert(key, Entry { value, created_at });
    }
}

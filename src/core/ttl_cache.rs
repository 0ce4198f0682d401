//! Time-based cache with a soft freshness threshold and a hard eviction
//! threshold.
//!
//! An entry younger than `max_age` is served by [`TtlCache::get`]. Older
//! entries are treated as a miss but stay in memory until a
//! [`TtlCache::sweep`] finds them older than `cleanup_age`. Sweeps run on
//! their own timer (see [`crate::core::CacheSweeper`]) so keys nobody asks for
//! again are still reclaimed.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::util::clock::{Clock, SystemClock};

/// A cached value and the instant it was stored.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// A fresh cache hit.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit<V> {
    /// The cached value.
    pub value: V,
    /// How long ago the value was stored.
    pub age: Duration,
}

/// Thread-safe TTL cache. All state sits behind one lock owned by this
/// instance.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    max_age: Duration,
    cleanup_age: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> std::fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries.lock().len())
            .field("max_age", &self.max_age)
            .field("cleanup_age", &self.cleanup_age)
            .finish_non_exhaustive()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
{
    /// Create a cache measuring age against the system clock.
    ///
    /// `cleanup_age` is raised to `max_age` if it is smaller.
    #[must_use]
    pub fn new(max_age: Duration, cleanup_age: Duration) -> Self {
        Self::with_clock(max_age, cleanup_age, Arc::new(SystemClock))
    }

    /// Create a cache measuring age against `clock`.
    #[must_use]
    pub fn with_clock(max_age: Duration, cleanup_age: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_age,
            cleanup_age: cleanup_age.max(max_age),
            clock,
        }
    }

    /// Freshness threshold.
    pub const fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Physical eviction threshold.
    pub const fn cleanup_age(&self) -> Duration {
        self.cleanup_age
    }

    /// Store `value` under `key` stamped with the current time, replacing any
    /// previous entry.
    pub fn put(&self, key: K, value: V) {
        let inserted_at = self.clock.now();
        self.entries
            .lock()
            .insert(key, CacheEntry { value, inserted_at });
    }

    /// Remove `key` regardless of age and return its value.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lock().remove(key).map(|e| e.value)
    }

    /// Whether an entry for `key` is physically present, fresh or not.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lock().contains_key(key)
    }

    /// Number of physically present entries, including stale ones.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no entries are present.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Remove every entry at least `cleanup_age` old. Returns how many were
    /// removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let cleanup_age = self.cleanup_age;
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, e| now.saturating_duration_since(e.inserted_at) < cleanup_age);
        let removed = before - entries.len();
        drop(entries);
        if removed > 0 {
            tracing::debug!(removed, "swept stale cache entries");
        }
        removed
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Snapshot of the keys physically present.
    pub fn keys(&self) -> Vec<K> {
        self.entries.lock().keys().cloned().collect()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Return the value for `key` if it is younger than `max_age`.
    ///
    /// Absent and expired entries both report `None`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup(key).map(|hit| hit.value)
    }

    /// Like [`get`](Self::get) but also reports the age of the value.
    pub fn lookup<Q>(&self, key: &Q) -> Option<CacheHit<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let entries = self.entries.lock();
        let hit = entries.get(key).and_then(|e| {
            let age = now.saturating_duration_since(e.inserted_at);
            (age < self.max_age).then(|| CacheHit {
                value: e.value.clone(),
                age,
            })
        });
        drop(entries);
        tracing::trace!(hit = hit.is_some(), "cache lookup");
        hit
    }
}

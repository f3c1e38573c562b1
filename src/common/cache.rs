//! In-memory cache for storing key-value pairs.
//!
//! Uses moka's concurrent cache implementation.

use moka::sync::Cache;

/// Thread-safe in-memory map backed by moka.
///
/// Used for storing the active remote context of every session
/// (`MemCache<SessionId, RemixContext>`). Entries are never evicted: a value
/// only leaves through [`MemCache::remove`].
#[derive(Clone)]
pub struct MemCache<K, V> {
    variables: Cache<K, V>,
}

impl<K, V> MemCache<K, V>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Allocate a new [`MemCache`] with room reserved for `capacity` entries.
    ///
    /// `capacity` is a sizing hint, not a bound.
    pub fn new(capacity: u64) -> Self {
        let capacity = usize::try_from(capacity).unwrap_or(usize::MAX);
        Self {
            variables: Cache::builder().initial_capacity(capacity).build(),
        }
    }

    /// Set a value, replacing any previous one.
    pub fn set(
        &self,
        key: K,
        value: V,
    ) {
        self.variables.insert(key, value);
    }

    /// Get a value through key `&K`.
    pub fn get(
        &self,
        key: &K,
    ) -> Option<V> {
        self.variables.get(key)
    }

    /// Remove a value through key `&K`, returning it if present.
    pub fn remove(
        &self,
        key: &K,
    ) -> Option<V> {
        self.variables.remove(key)
    }
}

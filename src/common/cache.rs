//! In-memory cache for storing key-value pairs.
//!
//! Uses moka's concurrent cache implementation.

use moka::sync::Cache;

/// Thread-safe in-memory cache with configurable capacity.
///
/// The executor keeps built tools here (`MemCache<String, Arc<dyn Tool>>`),
/// keyed by tool id and step config. Entries beyond the capacity are evicted.
#[derive(Clone)]
pub struct MemCache<K, V> {
    entries: Cache<K, V>,
}

impl<K, V> MemCache<K, V>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Allocate a new [`MemCache`].
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Cache::new(capacity as u64),
        }
    }

    pub fn set(
        &self,
        key: K,
        value: V,
    ) {
        self.entries.insert(key, value);
    }

    pub fn get(
        &self,
        key: &K,
    ) -> Option<V> {
        self.entries.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let cache: MemCache<String, String> = MemCache::new(16);
        assert_eq!(cache.get(&"json-minify:".to_string()), None);

        cache.set("json-minify:".to_string(), "tool".to_string());
        assert_eq!(cache.get(&"json-minify:".to_string()), Some("tool".to_string()));
    }
}

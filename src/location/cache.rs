//! In-process geocode cache.
//!
//! Keys are normalized (trimmed, lowercased) place names. Both successful and
//! failed lookups are remembered for the lifetime of the process: no TTL, no
//! eviction, no persistence.

use super::types::{normalize_query, Resolution};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Memoization store for geocode outcomes.
///
/// Implementations must be safe to share between concurrent resolutions.
pub trait GeocodeCache: Send + Sync {
    /// Cached outcome for `key`, or [`Resolution::NotAttempted`] on a miss.
    fn get(&self, key: &str) -> Resolution;

    /// Record an outcome. Storing `NotAttempted` forgets the key.
    fn put(&self, key: &str, value: Resolution);

    /// Number of remembered keys.
    fn len(&self) -> usize;

    /// Keys currently cached as `Unresolved`, sorted.
    fn unresolved_keys(&self) -> Vec<String>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The default cache: a `HashMap` behind a read/write lock.
#[derive(Debug, Default)]
pub struct MemoryGeocodeCache {
    entries: RwLock<HashMap<String, Resolution>>,
}

impl MemoryGeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GeocodeCache for MemoryGeocodeCache {
    fn get(&self, key: &str) -> Resolution {
        self.entries
            .read()
            .get(&normalize_query(key))
            .copied()
            .unwrap_or(Resolution::NotAttempted)
    }

    fn put(&self, key: &str, value: Resolution) {
        let key = normalize_query(key);
        let mut entries = self.entries.write();
        match value {
            Resolution::NotAttempted => {
                entries.remove(&key);
            }
            other => {
                // Last write wins for concurrent misses on the same key.
                entries.insert(key, other);
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn unresolved_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .iter()
            .filter(|(_, v)| matches!(v, Resolution::Unresolved))
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::types::Coordinate;
    use std::sync::Arc;
    use std::thread;

    fn chiang_mai() -> Coordinate {
        Coordinate::new(18.79, 98.98).unwrap()
    }

    #[test]
    fn test_cache_put_get() {
        let cache = MemoryGeocodeCache::new();
        cache.put("chiang mai", Resolution::Resolved(chiang_mai()));
        assert_eq!(cache.get("chiang mai"), Resolution::Resolved(chiang_mai()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_miss_is_not_attempted() {
        let cache = MemoryGeocodeCache::new();
        assert_eq!(cache.get("nonexistent"), Resolution::NotAttempted);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_case_insensitive() {
        let cache = MemoryGeocodeCache::new();
        cache.put("  Chiang Mai ", Resolution::Resolved(chiang_mai()));
        assert!(cache.get("CHIANG MAI").is_attempted());
        assert!(cache.get("chiang mai").is_attempted());
    }

    #[test]
    fn test_cache_remembers_failures() {
        let cache = MemoryGeocodeCache::new();
        cache.put("nowhere", Resolution::Unresolved);
        assert_eq!(cache.get("nowhere"), Resolution::Unresolved);
        assert_eq!(cache.unresolved_keys(), vec!["nowhere".to_string()]);
    }

    #[test]
    fn test_cache_forget() {
        let cache = MemoryGeocodeCache::new();
        cache.put("nowhere", Resolution::Unresolved);
        cache.put("nowhere", Resolution::NotAttempted);
        assert_eq!(cache.get("nowhere"), Resolution::NotAttempted);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_last_write_wins() {
        let cache = MemoryGeocodeCache::new();
        cache.put("chiang mai", Resolution::Unresolved);
        cache.put("chiang mai", Resolution::Resolved(chiang_mai()));
        assert_eq!(cache.get("chiang mai"), Resolution::Resolved(chiang_mai()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_concurrent_access() {
        let cache = Arc::new(MemoryGeocodeCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for j in 0..100 {
                        let key = format!("place-{}", (i * 100 + j) % 50);
                        cache.put(&key, Resolution::Unresolved);
                        assert!(cache.get(&key).is_attempted());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 50);
    }
}

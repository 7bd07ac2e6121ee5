//! Coordinate resolver: orchestrates the lookup chain.
//!
//! Order:  explicit coordinates → province table → cache → live geocode (→ cache)
//!
//! Nothing here returns an error. An endpoint that cannot be placed is `None`,
//! and checkout carries on without a shipping fee.

use super::cache::{GeocodeCache, MemoryGeocodeCache};
use super::geocoder::{Geocoder, NominatimClient};
use super::table::StaticLocationTable;
use super::types::{normalize_query, Coordinate, LocationQuery, LocationSource, Resolution, ResolvedLocation};
use crate::config::EngineConfig;
use std::sync::Arc;

/// The resolver with its fallback pipeline. Cheap to share behind an `Arc`.
pub struct CoordinateResolver {
    table: Arc<StaticLocationTable>,
    cache: Arc<dyn GeocodeCache>,
    geocoder: Arc<dyn Geocoder>,
    offline: bool,
}

impl CoordinateResolver {
    pub fn new(
        table: Arc<StaticLocationTable>,
        cache: Arc<dyn GeocodeCache>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            table,
            cache,
            geocoder,
            offline: false,
        }
    }

    /// Production wiring: built-in table, fresh memory cache, Nominatim.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            Arc::new(StaticLocationTable::thailand()),
            Arc::new(MemoryGeocodeCache::new()),
            Arc::new(NominatimClient::new(&config.geocoder)),
        )
    }

    /// Offline mode: table and cache only. A miss is left uncached.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn table(&self) -> &StaticLocationTable {
        &self.table
    }

    /// Coordinates for one endpoint, or `None` when it cannot be placed.
    pub fn resolve(&self, explicit: Option<Coordinate>, province: Option<&str>) -> Option<Coordinate> {
        self.resolve_traced(explicit, province).map(|r| r.coordinate)
    }

    /// [`resolve`](Self::resolve) for a raw query. Invalid or partial
    /// coordinate hints are ignored in favour of the province name.
    pub fn resolve_query(&self, query: &LocationQuery) -> Option<ResolvedLocation> {
        self.resolve_traced(query.explicit_coordinate(), query.province.as_deref())
    }

    /// Same as [`resolve`](Self::resolve), keeping track of where the answer came from.
    pub fn resolve_traced(&self, explicit: Option<Coordinate>, province: Option<&str>) -> Option<ResolvedLocation> {
        // 1. Caller already has ground truth
        if let Some(coordinate) = explicit {
            return Some(ResolvedLocation {
                coordinate,
                source: LocationSource::Explicit,
            });
        }

        // 2. Nothing to look up
        let name = province.map(str::trim).filter(|s| !s.is_empty())?;

        // 3. Static table (authoritative, never cached)
        if let Some(coordinate) = self.table.lookup(name) {
            tracing::debug!(province = name, %coordinate, "province table hit");
            return Some(ResolvedLocation {
                coordinate,
                source: LocationSource::Table,
            });
        }

        // 4. Cache, including remembered failures
        let key = normalize_query(name);
        match self.cache.get(&key) {
            Resolution::Resolved(coordinate) => {
                tracing::debug!(key = %key, %coordinate, "geocode cache hit");
                return Some(ResolvedLocation {
                    coordinate,
                    source: LocationSource::Cache,
                });
            }
            Resolution::Unresolved => {
                tracing::debug!(key = %key, "geocode cache hit (unresolved)");
                return None;
            }
            Resolution::NotAttempted => {}
        }

        if self.offline {
            tracing::debug!(key = %key, "offline; skipping geocoder");
            return None;
        }

        // 5. Live lookup with the caller's spelling; remember the outcome either way
        let outcome = self.geocoder.lookup(name);
        self.cache.put(&key, Resolution::from(outcome));
        if outcome.is_none() {
            tracing::warn!(key = %key, "could not geocode; cached as unresolved until restart");
        }
        outcome.map(|coordinate| ResolvedLocation {
            coordinate,
            source: LocationSource::Geocoder,
        })
    }

    /// Number of remembered geocode outcomes.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Place names currently remembered as failures.
    pub fn unresolved(&self) -> Vec<String> {
        self.cache.unresolved_keys()
    }

    /// Drop whatever the cache remembers for `province` so the next
    /// resolution queries the geocoder again.
    pub fn forget(&self, province: &str) -> Resolution {
        let key = normalize_query(province);
        let previous = self.cache.get(&key);
        self.cache.put(&key, Resolution::NotAttempted);
        if previous.is_attempted() {
            tracing::info!(key = %key, ?previous, "forgot cached geocode outcome");
        }
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::mock::SpyGeocoder;

    fn bangkok() -> Coordinate {
        Coordinate::new(13.75, 100.5).unwrap()
    }

    fn resolver_with(spy: Arc<SpyGeocoder>) -> (CoordinateResolver, Arc<MemoryGeocodeCache>) {
        let table = StaticLocationTable::from_entries([("Bangkok", bangkok())]);
        let cache = Arc::new(MemoryGeocodeCache::new());
        let resolver = CoordinateResolver::new(Arc::new(table), cache.clone(), spy);
        (resolver, cache)
    }

    #[test]
    fn test_explicit_coordinates_win() {
        let spy = Arc::new(SpyGeocoder::new());
        let (resolver, cache) = resolver_with(spy.clone());

        let explicit = bangkok();
        assert_eq!(resolver.resolve(Some(explicit), Some("Chiang Mai")), Some(explicit));
        assert_eq!(resolver.resolve(Some(explicit), None), Some(explicit));
        assert_eq!(spy.calls(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalid_hint_falls_through_to_province() {
        let spy = Arc::new(SpyGeocoder::new());
        let (resolver, _) = resolver_with(spy.clone());

        let query = LocationQuery {
            province: Some("Bangkok".into()),
            lat: Some(f64::NAN),
            lon: Some(100.5),
        };
        let r = resolver.resolve_query(&query).unwrap();
        assert_eq!(r.source, LocationSource::Table);
        assert_eq!(r.coordinate, bangkok());
    }

    #[test]
    fn test_no_input() {
        let spy = Arc::new(SpyGeocoder::new());
        let (resolver, _) = resolver_with(spy.clone());

        assert_eq!(resolver.resolve(None, None), None);
        assert_eq!(resolver.resolve(None, Some("")), None);
        assert_eq!(resolver.resolve(None, Some("   ")), None);
        assert_eq!(spy.calls(), 0);
    }

    #[test]
    fn test_table_hit_skips_geocoder_and_cache() {
        let spy = Arc::new(SpyGeocoder::new());
        let (resolver, cache) = resolver_with(spy.clone());

        assert_eq!(resolver.resolve(None, Some("Bangkok")), Some(bangkok()));
        assert_eq!(resolver.resolve(None, Some("bAnGkOk")), Some(bangkok()));
        assert_eq!(spy.calls(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failure_is_cached() {
        let spy = Arc::new(SpyGeocoder::new());
        let (resolver, cache) = resolver_with(spy.clone());

        assert_eq!(resolver.resolve(None, Some("Nonexistent Place")), None);
        assert_eq!(spy.calls(), 1);
        assert_eq!(cache.get("nonexistent place"), Resolution::Unresolved);

        assert_eq!(resolver.resolve(None, Some("Nonexistent Place")), None);
        assert_eq!(resolver.resolve(None, Some("  NONEXISTENT place ")), None);
        assert_eq!(spy.calls(), 1);
    }

    #[test]
    fn test_success_is_cached() {
        let spy = Arc::new(SpyGeocoder::new().with("Chiang Mai", 18.79, 98.98));
        let (resolver, cache) = resolver_with(spy.clone());

        let expected = Coordinate::new(18.79, 98.98).unwrap();
        let first = resolver.resolve_traced(None, Some("Chiang Mai")).unwrap();
        assert_eq!(first.coordinate, expected);
        assert_eq!(first.source, LocationSource::Geocoder);
        assert_eq!(cache.get("chiang mai"), Resolution::Resolved(expected));

        let second = resolver.resolve_traced(None, Some("Chiang Mai")).unwrap();
        assert_eq!(second.coordinate, expected);
        assert_eq!(second.source, LocationSource::Cache);
        assert_eq!(spy.calls(), 1);
    }

    #[test]
    fn test_geocoder_receives_raw_name() {
        // The spy matches exactly, so a lowercased name would miss.
        let spy = Arc::new(SpyGeocoder::new().with("Chiang Mai", 18.79, 98.98));
        let (resolver, _) = resolver_with(spy.clone());
        assert!(resolver.resolve(None, Some("Chiang Mai")).is_some());
    }

    #[test]
    fn test_offline_miss_is_not_cached() {
        let spy = Arc::new(SpyGeocoder::new().with("Chiang Mai", 18.79, 98.98));
        let (mut resolver, cache) = resolver_with(spy.clone());
        resolver.set_offline(true);

        assert_eq!(resolver.resolve(None, Some("Chiang Mai")), None);
        assert_eq!(spy.calls(), 0);
        assert!(cache.is_empty());

        resolver.set_offline(false);
        assert!(resolver.resolve(None, Some("Chiang Mai")).is_some());
        assert_eq!(spy.calls(), 1);
    }

    #[test]
    fn test_forget_allows_retry() {
        let spy = Arc::new(SpyGeocoder::new());
        let (resolver, _) = resolver_with(spy.clone());

        assert_eq!(resolver.resolve(None, Some("Nowhere")), None);
        assert_eq!(resolver.unresolved(), vec!["nowhere".to_string()]);
        assert_eq!(resolver.cached_len(), 1);
        assert_eq!(resolver.forget("NOWHERE"), Resolution::Unresolved);
        assert!(resolver.unresolved().is_empty());
        assert_eq!(resolver.forget("nowhere"), Resolution::NotAttempted);

        assert_eq!(resolver.resolve(None, Some("Nowhere")), None);
        assert_eq!(spy.calls(), 2);
    }

    #[test]
    fn test_concurrent_resolution() {
        let spy = Arc::new(SpyGeocoder::new().with("Chiang Mai", 18.79, 98.98));
        let (resolver, cache) = resolver_with(spy.clone());
        let resolver = Arc::new(resolver);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let resolver = Arc::clone(&resolver);
                std::thread::spawn(move || resolver.resolve(None, Some("Chiang Mai")))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), Some(Coordinate::new(18.79, 98.98).unwrap()));
        }

        // Concurrent misses may each hit the geocoder; the cache ends up with one entry.
        assert!(spy.calls() >= 1 && spy.calls() <= 8);
        assert_eq!(cache.len(), 1);
    }
}

use super::geocoder::Geocoder;
use super::types::Coordinate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned geocoder that counts every call it receives.
#[derive(Debug, Default)]
pub struct SpyGeocoder {
    responses: HashMap<String, Coordinate>,
    calls: AtomicUsize,
}

impl SpyGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `place` (matched exactly) with `lat`/`lon`.
    pub fn with(mut self, place: &str, lat: f64, lon: f64) -> Self {
        let coord = Coordinate::new(lat, lon).unwrap();
        self.responses.insert(place.to_string(), coord);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for SpyGeocoder {
    fn lookup(&self, place: &str) -> Option<Coordinate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses.get(place).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spy_counts_hits_and_misses() {
        let spy = SpyGeocoder::new().with("Chiang Mai", 18.79, 98.98);
        assert!(spy.lookup("Chiang Mai").is_some());
        assert!(spy.lookup("Nowhere").is_none());
        assert_eq!(spy.calls(), 2);
    }
}

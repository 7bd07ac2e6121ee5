//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A validated point on the Earth's surface.
///
/// Both fields are finite and in range; the only way to build one is
/// [`Coordinate::new`] (deserialization goes through the same check), so
/// downstream math never sees an out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lon)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        RawCoordinate { lat: c.lat, lon: c.lon }
    }
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NotFinite { lat, lon });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", self.lat.abs(), ns, self.lon.abs(), ew)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("coordinates must be finite numbers (got lat={lat}, lon={lon})")]
    NotFinite { lat: f64, lon: f64 },
    #[error("latitude {0} is outside -90..90")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside -180..180")]
    LongitudeOutOfRange(f64),
}

/// What a caller knows about one end of a shipment: a place name, a
/// coordinate hint, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationQuery {
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl LocationQuery {
    pub fn province(name: impl Into<String>) -> Self {
        Self {
            province: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn coords(lat: f64, lon: f64) -> Self {
        Self {
            province: None,
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    /// The coordinate hint, if both halves are present and valid.
    pub fn explicit_coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon).ok(),
            _ => None,
        }
    }

    /// The province name, trimmed, or `None` when blank.
    pub fn province_name(&self) -> Option<&str> {
        self.province.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Whether there is anything to resolve: a non-blank name or a valid
    /// coordinate hint. Blank names and partial hints do not count.
    pub fn is_specified(&self) -> bool {
        self.explicit_coordinate().is_some() || self.province_name().is_some()
    }
}

/// Cache key form of a place name: trimmed and lowercased.
pub fn normalize_query(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Outcome of a geocode attempt as remembered by the cache.
///
/// Serializes as `{"status": "resolved", "lat": .., "lon": ..}`,
/// `{"status": "unresolved"}` or `{"status": "not_attempted"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Resolved(Coordinate),
    /// Looked up and failed. Remembered for the process lifetime.
    Unresolved,
    /// Never looked up.
    NotAttempted,
}

impl Resolution {
    pub fn is_attempted(&self) -> bool {
        !matches!(self, Self::NotAttempted)
    }
}

impl From<Option<Coordinate>> for Resolution {
    fn from(value: Option<Coordinate>) -> Self {
        match value {
            Some(c) => Self::Resolved(c),
            None => Self::Unresolved,
        }
    }
}

/// How a coordinate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Explicit,
    Table,
    Cache,
    Geocoder,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => write!(f, "Explicit"),
            Self::Table => write!(f, "Province table"),
            Self::Cache => write!(f, "Cache"),
            Self::Geocoder => write!(f, "Geocoder"),
        }
    }
}

/// A coordinate together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub source: LocationSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(91.0, 0.0),
            Err(CoordinateError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.5),
            Err(CoordinateError::LongitudeOutOfRange(-180.5))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_coordinate_accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_coordinate_deserialize_validates() {
        let ok: Coordinate = serde_json::from_str(r#"{"lat": 13.75, "lon": 100.5}"#).unwrap();
        assert_eq!(ok.lat(), 13.75);
        assert_eq!(ok.lon(), 100.5);

        let bad = serde_json::from_str::<Coordinate>(r#"{"lat": 120.0, "lon": 100.5}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_coordinate_display() {
        let c = Coordinate::new(-33.8688, 151.2093).unwrap();
        assert_eq!(c.to_string(), "33.8688\u{00B0}S, 151.2093\u{00B0}E");
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Chiang Mai "), "chiang mai");
        assert_eq!(normalize_query("BANGKOK"), "bangkok");
    }

    #[test]
    fn test_query_explicit_requires_both_halves() {
        let half = LocationQuery {
            province: None,
            lat: Some(13.75),
            lon: None,
        };
        assert!(half.explicit_coordinate().is_none());
        assert!(LocationQuery::coords(13.75, 100.5).explicit_coordinate().is_some());
        assert!(LocationQuery::coords(200.0, 100.5).explicit_coordinate().is_none());
    }

    #[test]
    fn test_query_blank_province() {
        assert_eq!(LocationQuery::province("   ").province_name(), None);
        assert_eq!(LocationQuery::province(" Phuket ").province_name(), Some("Phuket"));
    }

    #[test]
    fn test_query_is_specified() {
        assert!(!LocationQuery::default().is_specified());
        assert!(!LocationQuery::province("").is_specified());
        assert!(!LocationQuery::province("  ").is_specified());
        assert!(!LocationQuery {
            province: None,
            lat: Some(13.75),
            lon: None,
        }
        .is_specified());
        assert!(!LocationQuery::coords(f64::NAN, 100.5).is_specified());
        assert!(LocationQuery::province("Phuket").is_specified());
        assert!(LocationQuery::coords(13.75, 100.5).is_specified());
    }

    #[test]
    fn test_resolution_serialize() {
        let c = Coordinate::new(18.79, 98.98).unwrap();
        assert_eq!(
            serde_json::to_value(Resolution::Resolved(c)).unwrap(),
            serde_json::json!({"status": "resolved", "lat": 18.79, "lon": 98.98})
        );
        assert_eq!(
            serde_json::to_value(Resolution::Unresolved).unwrap(),
            serde_json::json!({"status": "unresolved"})
        );
        assert_eq!(
            serde_json::to_value(Resolution::NotAttempted).unwrap(),
            serde_json::json!({"status": "not_attempted"})
        );
    }

    #[test]
    fn test_resolution_from_option() {
        let c = Coordinate::new(1.0, 2.0).unwrap();
        assert_eq!(Resolution::from(Some(c)), Resolution::Resolved(c));
        assert_eq!(Resolution::from(None), Resolution::Unresolved);
        assert!(!Resolution::NotAttempted.is_attempted());
        assert!(Resolution::Unresolved.is_attempted());
    }
}

//! Live geocoding against a Nominatim-compatible place search.
//!
//! One GET per lookup, no retry, no internal timeout. Every failure mode is
//! reported to the caller as "no result"; the distinct [`GeocodeError`] kinds
//! only feed the logs.

use super::types::{Coordinate, CoordinateError};
use crate::config::GeocoderConfig;
use serde::Deserialize;
use thiserror::Error;

/// Free-text place name → coordinate.
pub trait Geocoder: Send + Sync {
    /// Best-effort lookup. `None` covers every failure.
    fn lookup(&self, place: &str) -> Option<Coordinate>;
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    InvalidResponse(String),
    #[error("no match for '{0}'")]
    NotFound(String),
    #[error("first match has unusable coordinates: {0}")]
    BadCoordinates(String),
}

// ─── Nominatim response ─────────────────────────────────────────

#[derive(Deserialize, Debug, Clone)]
pub struct NominatimPlace {
    pub lat: NumericField,
    pub lon: NumericField,
}

/// Nominatim sends numbers as strings; some compatible services do not.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum NumericField {
    Text(String),
    Number(f64),
}

impl NumericField {
    fn parse(&self) -> Result<f64, GeocodeError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| GeocodeError::BadCoordinates(format!("'{}' is not a number", s))),
        }
    }
}

/// Pick the first match and turn it into a validated coordinate.
pub fn first_coordinate(place: &str, results: &[NominatimPlace]) -> Result<Coordinate, GeocodeError> {
    let first = results
        .first()
        .ok_or_else(|| GeocodeError::NotFound(place.to_string()))?;
    let lat = first.lat.parse()?;
    let lon = first.lon.parse()?;
    Coordinate::new(lat, lon).map_err(|e: CoordinateError| GeocodeError::BadCoordinates(e.to_string()))
}

// ─── Client ─────────────────────────────────────────────────────

/// Blocking Nominatim client.
pub struct NominatimClient {
    agent: ureq::Agent,
    endpoint: String,
    country: Option<String>,
    user_agent: String,
}

impl NominatimClient {
    pub fn new(config: &GeocoderConfig) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            endpoint: config.endpoint.clone(),
            country: config.country.clone().filter(|c| !c.trim().is_empty()),
            user_agent: config.user_agent.clone(),
        }
    }

    /// "Chiang Mai" → "Chiang Mai, Thailand".
    pub fn qualified_query(&self, place: &str) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", place.trim(), country),
            None => place.trim().to_string(),
        }
    }

    /// The lookup with its failure kind preserved.
    pub fn fetch(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        let q = self.qualified_query(place);

        let response = self
            .agent
            .get(&self.endpoint)
            .set("User-Agent", &self.user_agent)
            .query("q", &q)
            .query("format", "json")
            .query("limit", "1")
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => GeocodeError::Status(code),
                ureq::Error::Transport(t) => GeocodeError::Network(t.to_string()),
            })?;

        if response.status() != 200 {
            return Err(GeocodeError::Status(response.status()));
        }

        let results: Vec<NominatimPlace> = response
            .into_json()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        first_coordinate(place, &results)
    }
}

impl Geocoder for NominatimClient {
    fn lookup(&self, place: &str) -> Option<Coordinate> {
        match self.fetch(place) {
            Ok(coord) => {
                tracing::info!(place, %coord, "geocoded");
                Some(coord)
            }
            Err(e) => {
                tracing::warn!(place, error = %e, "geocode lookup failed");
                None
            }
        }
    }
}

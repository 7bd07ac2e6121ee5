//! Location resolution for shipping quotes.
//!
//! Turns a province name or a coordinate hint into a validated coordinate
//! using the static province table, an in-process geocode cache and a live
//! Nominatim lookup.

pub mod cache;
pub mod geocoder;
#[cfg(test)]
pub(crate) mod mock;
pub mod resolver;
pub mod table;
pub mod types;

pub use cache::{GeocodeCache, MemoryGeocodeCache};
pub use geocoder::{GeocodeError, Geocoder, NominatimClient};
pub use resolver::CoordinateResolver;
pub use table::{ProvinceInfo, StaticLocationTable};
pub use types::{normalize_query, Coordinate, CoordinateError, LocationQuery, LocationSource, Resolution, ResolvedLocation};

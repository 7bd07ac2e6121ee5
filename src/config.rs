//! Engine configuration at ~/.shipping-fee/config.json.
//!
//! Every field is optional; a missing default file means built-in defaults.
//! An explicitly named file must exist and parse.

use crate::fee::{FeeSchedule, FeeScheduleError, FeeTier};
use crate::location::LocationQuery;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_COUNTRY: &str = "Thailand";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid fee_tiers in {path}: {source}")]
    InvalidTiers {
        path: PathBuf,
        #[source]
        source: FeeScheduleError,
    },
}

/// Outbound geocoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Nominatim-compatible search URL.
    pub endpoint: String,
    /// Appended to every query, e.g. "Chiang Mai" → "Chiang Mai, Thailand".
    pub country: Option<String>,
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            country: Some(DEFAULT_COUNTRY.to_string()),
            user_agent: format!("ShippingFee/{} (checkout-fee-engine)", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub geocoder: GeocoderConfig,
    pub fee_tiers: FeeSchedule,
    /// Where parcels ship from when a request does not say.
    pub origin: Option<LocationQuery>,
}

/// On-disk shape. Tiers are validated after parsing so a bad schedule
/// reports as [`ConfigError::InvalidTiers`] rather than a parse error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    geocoder: GeocoderConfig,
    fee_tiers: Option<Vec<FeeTier>>,
    origin: Option<LocationQuery>,
}

impl EngineConfig {
    /// Load from `path` if given, else from the default location, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load_from(p),
            None => {
                let p = Self::default_path();
                if p.exists() {
                    Self::load_from(&p)
                } else {
                    tracing::debug!(path = %p.display(), "no config file; using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let fee_tiers = match file.fee_tiers {
            Some(tiers) => FeeSchedule::new(tiers).map_err(|source| ConfigError::InvalidTiers {
                path: path.to_path_buf(),
                source,
            })?,
            None => FeeSchedule::default(),
        };
        let config = Self {
            geocoder: file.geocoder,
            fee_tiers,
            origin: file.origin,
        };
        tracing::info!(path = %path.display(), tiers = config.fee_tiers.tiers().len(), "loaded config");
        Ok(config)
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shipping-fee")
            .join("config.json")
    }
}

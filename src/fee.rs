//! Great-circle distance and tiered delivery fees.
//!
//! Distance is haversine on a sphere of mean Earth radius, in kilometres and
//! unrounded. Fees are in currency minor units (satang for THB).

use crate::location::Coordinate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometres.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lon = (b.lon() - a.lon()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// One step of the fee schedule. `up_to_km: None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeTier {
    pub up_to_km: Option<f64>,
    pub fee: u64,
}

impl FeeTier {
    pub const fn bounded(up_to_km: f64, fee: u64) -> Self {
        Self { up_to_km: Some(up_to_km), fee }
    }

    pub const fn unbounded(fee: u64) -> Self {
        Self { up_to_km: None, fee }
    }

    fn covers(&self, distance_km: f64) -> bool {
        self.up_to_km.map_or(true, |bound| distance_km <= bound)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeeScheduleError {
    #[error("fee schedule has no tiers")]
    Empty,
    #[error("tier {index}: bound must be a positive number (got {bound})")]
    InvalidBound { index: usize, bound: f64 },
    #[error("tier {index}: bound {bound} km does not exceed the previous tier's {previous} km")]
    BoundsNotAscending { index: usize, bound: f64, previous: f64 },
    #[error("tier {index}: fee {fee} is lower than the previous tier's {previous}")]
    FeeDecreases { index: usize, fee: u64, previous: u64 },
    #[error("tier {index}: only the last tier may be unbounded")]
    UnboundedNotLast { index: usize },
}

/// Ordered, validated list of fee tiers.
///
/// Bounds ascend strictly and fees never decrease, so the fee is monotonic
/// in distance. Beyond the last bound the last tier's fee applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FeeTier>", into = "Vec<FeeTier>")]
pub struct FeeSchedule {
    tiers: Vec<FeeTier>,
}

impl FeeSchedule {
    pub fn new(tiers: Vec<FeeTier>) -> Result<Self, FeeScheduleError> {
        if tiers.is_empty() {
            return Err(FeeScheduleError::Empty);
        }

        let last = tiers.len() - 1;
        let mut prev_bound: Option<f64> = None;
        let mut prev_fee: Option<u64> = None;

        for (index, tier) in tiers.iter().enumerate() {
            match tier.up_to_km {
                Some(bound) => {
                    if !bound.is_finite() || bound <= 0.0 {
                        return Err(FeeScheduleError::InvalidBound { index, bound });
                    }
                    if let Some(previous) = prev_bound {
                        if bound <= previous {
                            return Err(FeeScheduleError::BoundsNotAscending { index, bound, previous });
                        }
                    }
                    prev_bound = Some(bound);
                }
                None if index != last => return Err(FeeScheduleError::UnboundedNotLast { index }),
                None => {}
            }
            if let Some(previous) = prev_fee {
                if tier.fee < previous {
                    return Err(FeeScheduleError::FeeDecreases { index, fee: tier.fee, previous });
                }
            }
            prev_fee = Some(tier.fee);
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[FeeTier] {
        &self.tiers
    }

    /// Fee for a non-negative distance. Always defined.
    pub fn fee_for(&self, distance_km: f64) -> u64 {
        self.tiers
            .iter()
            .find(|t| t.covers(distance_km))
            .or_else(|| self.tiers.last())
            .map_or(0, |t| t.fee)
    }

    /// The cheapest fee (first tier).
    pub fn minimum_fee(&self) -> u64 {
        self.tiers.first().map_or(0, |t| t.fee)
    }
}

impl Default for FeeSchedule {
    /// Domestic THB schedule, in satang.
    fn default() -> Self {
        Self {
            tiers: vec![
                FeeTier::bounded(50.0, 4_000),
                FeeTier::bounded(200.0, 6_000),
                FeeTier::bounded(500.0, 9_000),
                FeeTier::bounded(800.0, 12_000),
                FeeTier::unbounded(15_000),
            ],
        }
    }
}

impl TryFrom<Vec<FeeTier>> for FeeSchedule {
    type Error = FeeScheduleError;

    fn try_from(tiers: Vec<FeeTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<FeeSchedule> for Vec<FeeTier> {
    fn from(schedule: FeeSchedule) -> Self {
        schedule.tiers
    }
}

/// Distance between two endpoints and the fee it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceFee {
    pub distance_km: f64,
    pub fee: u64,
}

/// Pure distance → fee calculator over a fixed schedule.
#[derive(Debug, Clone, Default)]
pub struct DistanceFeeCalculator {
    schedule: FeeSchedule,
}

impl DistanceFeeCalculator {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    pub fn compute_distance_and_fee(&self, a: Coordinate, b: Coordinate) -> DistanceFee {
        let distance_km = haversine_km(a, b);
        DistanceFee {
            distance_km,
            fee: self.schedule.fee_for(distance_km),
        }
    }
}

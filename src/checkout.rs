//! Checkout glue: resolve both ends of a shipment and price it.
//!
//! A quote never fails. If either endpoint cannot be placed the quote simply
//! has no distance and no fee, and the payment session goes ahead without
//! shipping metadata.

use crate::config::EngineConfig;
use crate::fee::{DistanceFee, DistanceFeeCalculator};
use crate::location::{Coordinate, CoordinateResolver, LocationQuery, ResolvedLocation};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const META_DISTANCE_KM: &str = "shipping_distance_km";
pub const META_FEE: &str = "shipping_fee";
pub const META_QUOTED_AT: &str = "shipping_quoted_at";

/// Result of pricing one shipment.
#[derive(Debug, Clone, Serialize)]
pub struct ShippingQuote {
    pub origin: Option<ResolvedLocation>,
    pub destination: Option<ResolvedLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Minor currency units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<u64>,
    pub quoted_at: DateTime<Utc>,
}

impl ShippingQuote {
    pub fn is_priced(&self) -> bool {
        self.fee.is_some()
    }

    /// Key/value pairs to attach to the payment session. Empty when unpriced.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let mut meta = BTreeMap::new();
        if let (Some(distance), Some(fee)) = (self.distance_km, self.fee) {
            meta.insert(META_DISTANCE_KM.to_string(), format!("{:.2}", distance));
            meta.insert(META_FEE.to_string(), fee.to_string());
            meta.insert(
                META_QUOTED_AT.to_string(),
                self.quoted_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            );
        }
        meta
    }
}

pub struct CheckoutIntegration {
    resolver: Arc<CoordinateResolver>,
    calculator: DistanceFeeCalculator,
}

impl CheckoutIntegration {
    pub fn new(resolver: Arc<CoordinateResolver>, calculator: DistanceFeeCalculator) -> Self {
        Self { resolver, calculator }
    }

    /// Production wiring. `offline` keeps the resolver off the network.
    pub fn from_config(config: &EngineConfig, offline: bool) -> Self {
        let mut resolver = CoordinateResolver::from_config(config);
        resolver.set_offline(offline);
        Self::new(
            Arc::new(resolver),
            DistanceFeeCalculator::new(config.fee_tiers.clone()),
        )
    }

    pub fn resolver(&self) -> &CoordinateResolver {
        &self.resolver
    }

    pub fn resolve_coordinates(&self, explicit: Option<Coordinate>, province: Option<&str>) -> Option<Coordinate> {
        self.resolver.resolve(explicit, province)
    }

    pub fn compute_fee(&self, a: Coordinate, b: Coordinate) -> DistanceFee {
        self.calculator.compute_distance_and_fee(a, b)
    }

    /// Price a shipment from `origin` to `destination`.
    pub fn quote(&self, origin: &LocationQuery, destination: &LocationQuery) -> ShippingQuote {
        let from = self.resolver.resolve_query(origin);
        let to = self.resolver.resolve_query(destination);

        let priced = match (from, to) {
            (Some(a), Some(b)) => Some(self.compute_fee(a.coordinate, b.coordinate)),
            _ => None,
        };

        match priced {
            Some(p) => tracing::info!(
                origin = ?origin.province,
                destination = ?destination.province,
                distance_km = p.distance_km,
                fee = p.fee,
                "shipping quoted"
            ),
            None => tracing::warn!(
                origin = ?origin.province,
                destination = ?destination.province,
                origin_resolved = from.is_some(),
                destination_resolved = to.is_some(),
                "shipping fee unavailable; continuing without it"
            ),
        }

        ShippingQuote {
            origin: from,
            destination: to,
            distance_km: priced.map(|p| p.distance_km),
            fee: priced.map(|p| p.fee),
            quoted_at: Utc::now(),
        }
    }
}

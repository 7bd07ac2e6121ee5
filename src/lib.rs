//! Shipping distance and delivery fee engine for checkout.
//!
//! Resolves both ends of a shipment to coordinates (explicit coordinates,
//! the static province table, a memoized geocoder), measures the
//! great-circle distance between them and maps it onto a tiered fee.

pub mod checkout;
pub mod config;
pub mod fee;
pub mod location;
pub mod server;

pub use checkout::{CheckoutIntegration, ShippingQuote};
pub use config::EngineConfig;
pub use fee::{DistanceFee, DistanceFeeCalculator, FeeSchedule, FeeTier};
pub use location::{Coordinate, CoordinateResolver, LocationQuery};

// Engine configuration
//
// The pricing constants are business parameters, not code: defaults match
// the values the product launched with, and deployments override them
// without a code change.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pricing parameters for distance-mode cities without a configured rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistancePricing {
    /// Delivery cap in meters when the city has no rate row (30 km)
    pub default_max_distance_m: f64,
    /// Flat price covering the first `base_radius_m` of the trip
    pub base_price: Decimal,
    /// Radius covered by the base price, in meters (5 km)
    pub base_radius_m: f64,
    /// Surcharge per additional full kilometer, rounded up
    pub per_km_surcharge: Decimal,
}

impl Default for DistancePricing {
    fn default() -> Self {
        Self {
            default_max_distance_m: 30_000.0,
            base_price: Decimal::from(500),
            base_radius_m: 5_000.0,
            per_km_surcharge: Decimal::from(100),
        }
    }
}

/// Pricing parameters for the last-resort fallback estimator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackPricing {
    /// Hard serviceability cap in meters (50 km); beyond it no price exists
    pub max_distance_m: f64,
    /// Flat base added to every fallback estimate
    pub base_price: Decimal,
    /// Linear rate per kilometer of straight-line distance
    pub per_km_rate: Decimal,
}

impl Default for FallbackPricing {
    fn default() -> Self {
        Self {
            max_distance_m: 50_000.0,
            base_price: Decimal::from(300),
            per_km_rate: Decimal::from(50),
        }
    }
}

/// Top-level configuration for the zone resolver
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryConfig {
    pub distance: DistancePricing,
    pub fallback: FallbackPricing,
    /// Deadline applied to each individual store/oracle read. A timed-out
    /// read counts as a strategy failure, never a hang.
    pub store_timeout: Option<Duration>,
}

// Fallback delivery price estimator
//
// Last resort when no primary strategy can place the address in a zone:
// flat base plus a linear per-km rate, capped at a hard serviceability
// distance.

use crate::config::FallbackPricing;
use crate::geo::haversine_distance;
use crate::models::Coordinate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Distance-capped flat-rate-plus-per-km estimator
pub struct FallbackEstimator {
    pricing: FallbackPricing,
}

impl FallbackEstimator {
    /// Create an estimator with the given pricing parameters
    pub fn new(pricing: FallbackPricing) -> Self {
        Self { pricing }
    }

    /// Estimate a delivery price between the business and the destination.
    ///
    /// Returns `None` when the straight-line distance exceeds the
    /// serviceability cap, meaning the address cannot be delivered to at all.
    pub fn estimate(&self, business: Coordinate, destination: Coordinate) -> Option<Decimal> {
        self.estimate_for_distance(haversine_distance(business, destination))
    }

    /// Estimate from an already-computed straight-line distance in meters
    pub fn estimate_for_distance(&self, distance_m: f64) -> Option<Decimal> {
        if distance_m > self.pricing.max_distance_m {
            return None;
        }

        let km = Decimal::from_f64(distance_m / 1000.0)?;
        let price = self.pricing.base_price + km * self.pricing.per_km_rate;
        Some(price.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }
}

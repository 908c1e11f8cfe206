// Zone resolution strategies
//
// Each delivery mode maps to one strategy. A strategy either resolves the
// address to a priced result or reports itself inconclusive; store and
// oracle failures inside a strategy are recovered here and count as
// inconclusive, so the resolver can continue down the fallback chain.

use crate::config::DistancePricing;
use crate::delivery::types::{DeliveryResult, DeliveryType};
use crate::geo::haversine_distance;
use crate::models::{Business, City, Coordinate};
use crate::stores::{bounded, AreaStore, GeometryOracle, RateStore};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

/// Diagnostic measurements gathered while a strategy ran, carried into the
/// fallback result when the strategy could not resolve the address
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneDiagnostics {
    pub max_distance: Option<f64>,
    pub current_distance: Option<f64>,
}

impl ZoneDiagnostics {
    /// Merge measurements from a later strategy, keeping existing ones
    /// unless the newer attempt produced a value
    pub fn absorb(&mut self, other: ZoneDiagnostics) {
        if other.max_distance.is_some() {
            self.max_distance = other.max_distance;
        }
        if other.current_distance.is_some() {
            self.current_distance = other.current_distance;
        }
    }
}

/// What a single strategy produced for an address
#[derive(Debug)]
pub enum StrategyOutcome {
    /// The address was placed in a zone; resolution stops here
    Resolved(DeliveryResult),

    /// The strategy could not place the address; try the next step
    Inconclusive(ZoneDiagnostics),
}

/// One step of the zone resolution pipeline
///
/// The resolver runs strategies in order and stops at the first
/// `Resolved`. Implementations must never return an error: anything that
/// prevents a verdict is an `Inconclusive`.
#[async_trait]
pub trait ZoneStrategy: Send + Sync {
    async fn evaluate(
        &self,
        destination: Coordinate,
        business: &Business,
        city: &City,
    ) -> StrategyOutcome;
}

/// Tiered distance price: a flat base covers the first `base_radius_m`,
/// then a surcharge applies per additional full kilometer, rounded up.
pub fn distance_price(pricing: &DistancePricing, distance_m: f64) -> Decimal {
    let extra_m = (distance_m - pricing.base_radius_m).max(0.0);
    let extra_km = (extra_m / 1000.0).ceil() as i64;
    pricing.base_price + Decimal::from(extra_km) * pricing.per_km_surcharge
}

/// Distance-mode strategy: city-border containment, then a capped
/// straight-line distance priced flat or tiered
pub struct DistanceStrategy {
    geometry: Arc<dyn GeometryOracle>,
    rates: Arc<dyn RateStore>,
    pricing: DistancePricing,
    store_timeout: Option<Duration>,
}

impl DistanceStrategy {
    pub fn new(
        geometry: Arc<dyn GeometryOracle>,
        rates: Arc<dyn RateStore>,
        pricing: DistancePricing,
        store_timeout: Option<Duration>,
    ) -> Self {
        Self {
            geometry,
            rates,
            pricing,
            store_timeout,
        }
    }
}

#[async_trait]
impl ZoneStrategy for DistanceStrategy {
    async fn evaluate(
        &self,
        destination: Coordinate,
        business: &Business,
        city: &City,
    ) -> StrategyOutcome {
        let Some(border) = city.border_polygon else {
            tracing::warn!(city_id = city.id, "distance-mode city has no border polygon");
            return StrategyOutcome::Inconclusive(ZoneDiagnostics::default());
        };

        match bounded(self.store_timeout, self.geometry.contains(border, destination)).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(city_id = city.id, %destination, "destination outside city border");
                return StrategyOutcome::Inconclusive(ZoneDiagnostics::default());
            }
            Err(e) => {
                tracing::warn!(city_id = city.id, error = %e, "border containment test failed");
                return StrategyOutcome::Inconclusive(ZoneDiagnostics::default());
            }
        }

        let current_distance = haversine_distance(destination, business.coordinate);

        let rate = match bounded(self.store_timeout, self.rates.get_by_city_id(city.id)).await {
            Ok(rate) => rate,
            Err(e) => {
                tracing::warn!(city_id = city.id, error = %e, "rate lookup failed");
                return StrategyOutcome::Inconclusive(ZoneDiagnostics {
                    max_distance: None,
                    current_distance: Some(current_distance),
                });
            }
        };

        let max_distance = rate
            .as_ref()
            .and_then(|r| r.base_distance_km)
            .map(|km| km * 1000.0)
            .unwrap_or(self.pricing.default_max_distance_m);

        if current_distance > max_distance {
            tracing::debug!(
                city_id = city.id,
                current_distance,
                max_distance,
                "destination beyond distance cap"
            );
            return StrategyOutcome::Inconclusive(ZoneDiagnostics {
                max_distance: Some(max_distance),
                current_distance: Some(current_distance),
            });
        }

        let price = rate
            .and_then(|r| r.base_distance_price)
            .unwrap_or_else(|| distance_price(&self.pricing, current_distance));

        StrategyOutcome::Resolved(DeliveryResult {
            in_zone: true,
            price: Some(price),
            delivery_type: DeliveryType::Distance,
            message: "delivery available".to_string(),
            max_distance: Some(max_distance),
            current_distance: Some(current_distance),
        })
    }
}

/// Area-mode strategy: the pickup area containing the business, then the
/// cheapest of its delivery areas containing the destination
pub struct AreaStrategy {
    geometry: Arc<dyn GeometryOracle>,
    areas: Arc<dyn AreaStore>,
    store_timeout: Option<Duration>,
}

impl AreaStrategy {
    pub fn new(
        geometry: Arc<dyn GeometryOracle>,
        areas: Arc<dyn AreaStore>,
        store_timeout: Option<Duration>,
    ) -> Self {
        Self {
            geometry,
            areas,
            store_timeout,
        }
    }
}

#[async_trait]
impl ZoneStrategy for AreaStrategy {
    async fn evaluate(
        &self,
        destination: Coordinate,
        business: &Business,
        _city: &City,
    ) -> StrategyOutcome {
        let pickup = match bounded(
            self.store_timeout,
            self.areas.find_pickup_area_containing(business.coordinate),
        )
        .await
        {
            Ok(Some(pickup)) => pickup,
            Ok(None) => {
                tracing::debug!(business_id = business.id, "no pickup area contains the business");
                return StrategyOutcome::Inconclusive(ZoneDiagnostics::default());
            }
            Err(e) => {
                tracing::warn!(business_id = business.id, error = %e, "pickup area lookup failed");
                return StrategyOutcome::Inconclusive(ZoneDiagnostics::default());
            }
        };

        let mut delivery_areas =
            match bounded(self.store_timeout, self.areas.find_delivery_areas(pickup.id)).await {
                Ok(areas) => areas,
                Err(e) => {
                    tracing::warn!(pickup_area_id = pickup.id, error = %e, "delivery area lookup failed");
                    return StrategyOutcome::Inconclusive(ZoneDiagnostics::default());
                }
            };

        // The store contract orders ascending by price; a stable re-sort
        // keeps "lowest price, first match on ties" independent of the
        // store implementation.
        delivery_areas.sort_by(|a, b| a.price.cmp(&b.price));

        for area in delivery_areas {
            match bounded(self.store_timeout, self.geometry.contains(area.polygon, destination))
                .await
            {
                Ok(true) => {
                    return StrategyOutcome::Resolved(DeliveryResult {
                        in_zone: true,
                        price: Some(area.price),
                        delivery_type: DeliveryType::Area,
                        message: "delivery available".to_string(),
                        max_distance: None,
                        current_distance: None,
                    });
                }
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!(area_id = area.id, error = %e, "area containment test failed");
                    return StrategyOutcome::Inconclusive(ZoneDiagnostics::default());
                }
            }
        }

        tracing::debug!(
            pickup_area_id = pickup.id,
            %destination,
            "no delivery area contains the destination"
        );
        StrategyOutcome::Inconclusive(ZoneDiagnostics::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_distance_price_inside_base_radius() {
        // 4 km is covered entirely by the 500 base
        let price = distance_price(&DistancePricing::default(), 4_000.0);
        assert_eq!(price, dec!(500));
    }

    #[test]
    fn test_distance_price_at_exact_base_radius() {
        let price = distance_price(&DistancePricing::default(), 5_000.0);
        assert_eq!(price, dec!(500));
    }

    #[test]
    fn test_distance_price_rounds_partial_km_up() {
        // 7.2 km: 2.2 km over the base radius bills as 3 full km
        let price = distance_price(&DistancePricing::default(), 7_200.0);
        assert_eq!(price, dec!(800));
    }

    #[test]
    fn test_distance_price_whole_extra_km() {
        // exactly 2 km over the base radius
        let price = distance_price(&DistancePricing::default(), 7_000.0);
        assert_eq!(price, dec!(700));
    }

    #[test]
    fn test_diagnostics_absorb_keeps_newer_values() {
        let mut diag = ZoneDiagnostics {
            max_distance: Some(30_000.0),
            current_distance: None,
        };
        diag.absorb(ZoneDiagnostics {
            max_distance: None,
            current_distance: Some(31_000.0),
        });
        assert_eq!(diag.max_distance, Some(30_000.0));
        assert_eq!(diag.current_distance, Some(31_000.0));
    }
}

// Delivery Zone & Price Resolution
//
// Determines whether an address can be delivered to from a business and at
// what price. The resolver dispatches on the city's delivery mode, runs the
// matching strategy, and degrades to the fallback estimator whenever the
// primary strategy cannot place the address. Once the coordinate is valid,
// a `DeliveryResult` is always produced; domain conditions never raise.

pub mod fallback;
pub mod strategy;
pub mod types;

pub use fallback::FallbackEstimator;
pub use strategy::{
    distance_price, AreaStrategy, DistanceStrategy, StrategyOutcome, ZoneDiagnostics, ZoneStrategy,
};
pub use types::{DeliveryArea, DeliveryRate, DeliveryResult, DeliveryType, PickupArea};

use crate::config::DeliveryConfig;
use crate::error::EngineResult;
use crate::models::{Business, City, Coordinate, DeliveryMode};
use crate::stores::{bounded, AreaStore, BusinessStore, CityStore, GeometryOracle, RateStore};
use std::sync::Arc;
use validator::Validate;

/// Zone resolver
///
/// Orchestrates the mode-specific strategies and the fallback estimator
/// over injected store interfaces. Stateless: every call re-reads the
/// entities it needs, so concurrent resolutions need no coordination.
pub struct ZoneResolver {
    businesses: Arc<dyn BusinessStore>,
    cities: Arc<dyn CityStore>,
    rates: Arc<dyn RateStore>,
    areas: Arc<dyn AreaStore>,
    geometry: Arc<dyn GeometryOracle>,
    config: DeliveryConfig,
}

impl ZoneResolver {
    /// Create a resolver with default pricing configuration
    pub fn new(
        businesses: Arc<dyn BusinessStore>,
        cities: Arc<dyn CityStore>,
        rates: Arc<dyn RateStore>,
        areas: Arc<dyn AreaStore>,
        geometry: Arc<dyn GeometryOracle>,
    ) -> Self {
        Self::with_config(businesses, cities, rates, areas, geometry, DeliveryConfig::default())
    }

    /// Create a resolver with explicit pricing configuration
    pub fn with_config(
        businesses: Arc<dyn BusinessStore>,
        cities: Arc<dyn CityStore>,
        rates: Arc<dyn RateStore>,
        areas: Arc<dyn AreaStore>,
        geometry: Arc<dyn GeometryOracle>,
        config: DeliveryConfig,
    ) -> Self {
        Self {
            businesses,
            cities,
            rates,
            areas,
            geometry,
            config,
        }
    }

    /// Resolve whether `coordinate` can be delivered to from `business_id`
    /// and at what price.
    ///
    /// # Errors
    /// - `EngineError::InvalidCoordinate` for out-of-range coordinates,
    ///   rejected before any store access
    /// - `EngineError::Store` when the initial business or city lookup
    ///   fails outright
    ///
    /// Everything else, including strategy-internal store failures, is
    /// absorbed into the returned `DeliveryResult`.
    pub async fn resolve(
        &self,
        coordinate: Coordinate,
        business_id: i32,
    ) -> EngineResult<DeliveryResult> {
        coordinate.validate()?;

        let timeout = self.config.store_timeout;

        let Some(business) = bounded(timeout, self.businesses.get(business_id)).await? else {
            tracing::warn!(business_id, "delivery check for unknown business");
            return Ok(DeliveryResult {
                in_zone: false,
                price: None,
                delivery_type: DeliveryType::Fallback,
                message: "business not found".to_string(),
                max_distance: None,
                current_distance: None,
            });
        };

        let city = bounded(timeout, self.cities.get_by_business_id(business_id)).await?;

        let mut diagnostics = ZoneDiagnostics::default();
        if let Some(city) = city.as_ref() {
            for strategy in self.primary_strategies(city) {
                match strategy.evaluate(coordinate, &business, city).await {
                    StrategyOutcome::Resolved(result) => {
                        tracing::debug!(
                            business_id,
                            delivery_type = %result.delivery_type,
                            in_zone = result.in_zone,
                            "zone resolved by primary strategy"
                        );
                        return Ok(result);
                    }
                    StrategyOutcome::Inconclusive(diag) => diagnostics.absorb(diag),
                }
            }
        } else {
            tracing::debug!(business_id, "no city configured, falling back directly");
        }

        Ok(self.estimate_fallback(coordinate, &business, diagnostics))
    }

    /// Strategies to try before the fallback estimator, in order
    fn primary_strategies(&self, city: &City) -> Vec<Box<dyn ZoneStrategy>> {
        let timeout = self.config.store_timeout;
        match city.delivery_mode {
            DeliveryMode::Distance => vec![Box::new(DistanceStrategy::new(
                Arc::clone(&self.geometry),
                Arc::clone(&self.rates),
                self.config.distance.clone(),
                timeout,
            ))],
            DeliveryMode::Area => vec![Box::new(AreaStrategy::new(
                Arc::clone(&self.geometry),
                Arc::clone(&self.areas),
                timeout,
            ))],
            DeliveryMode::Unknown => {
                tracing::debug!(city_id = city.id, "unknown delivery mode, falling back directly");
                vec![]
            }
        }
    }

    /// Terminal step: distance-capped flat-rate estimate
    fn estimate_fallback(
        &self,
        coordinate: Coordinate,
        business: &Business,
        diagnostics: ZoneDiagnostics,
    ) -> DeliveryResult {
        let estimator = FallbackEstimator::new(self.config.fallback.clone());
        match estimator.estimate(business.coordinate, coordinate) {
            Some(price) => DeliveryResult {
                in_zone: true,
                price: Some(price),
                delivery_type: DeliveryType::Fallback,
                message: "delivery available at estimated rate".to_string(),
                max_distance: diagnostics.max_distance,
                current_distance: diagnostics.current_distance,
            },
            None => DeliveryResult {
                in_zone: false,
                price: None,
                delivery_type: DeliveryType::Fallback,
                message: "address is outside the serviceable delivery range".to_string(),
                max_distance: diagnostics.max_distance,
                current_distance: diagnostics.current_distance,
            },
        }
    }
}

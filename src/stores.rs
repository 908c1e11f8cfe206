// External collaborator interfaces
//
// The engines never touch a database or geometry library directly; the
// surrounding system implements these traits and injects them. All reads
// are independent and may run concurrently; each one can be bounded by the
// configured deadline.

use crate::delivery::types::{DeliveryArea, DeliveryRate, PickupArea};
use crate::error::StoreError;
use crate::models::{Business, City, Coordinate};
use crate::promotions::types::Promotion;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;

/// Point-in-polygon testing over stored polygons
#[async_trait]
pub trait GeometryOracle: Send + Sync {
    /// Whether the polygon with the given id contains the coordinate
    async fn contains(&self, polygon_id: i32, coordinate: Coordinate) -> Result<bool, StoreError>;
}

/// Business lookup
#[async_trait]
pub trait BusinessStore: Send + Sync {
    async fn get(&self, business_id: i32) -> Result<Option<Business>, StoreError>;
}

/// City lookup by owning business
#[async_trait]
pub trait CityStore: Send + Sync {
    async fn get_by_business_id(&self, business_id: i32) -> Result<Option<City>, StoreError>;
}

/// Distance-mode rate lookup
#[async_trait]
pub trait RateStore: Send + Sync {
    async fn get_by_city_id(&self, city_id: i32) -> Result<Option<DeliveryRate>, StoreError>;
}

/// Pickup/delivery area lookups for area-mode cities
#[async_trait]
pub trait AreaStore: Send + Sync {
    /// The pickup area whose polygon contains the coordinate, if any
    async fn find_pickup_area_containing(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<PickupArea>, StoreError>;

    /// All delivery areas of a pickup area, ordered ascending by price
    async fn find_delivery_areas(
        &self,
        pickup_area_id: i32,
    ) -> Result<Vec<DeliveryArea>, StoreError>;
}

/// Active promotion catalog for a business
#[async_trait]
pub trait PromotionStore: Send + Sync {
    /// Promotions visible and in-window at `now`, with their details
    async fn get_active(
        &self,
        business_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Promotion>, StoreError>;
}

/// Runs a store read under the caller-supplied deadline.
///
/// With no deadline configured the read is awaited as-is. A timed-out read
/// surfaces as `StoreError::Timeout` so the resolver can treat it like any
/// other strategy failure instead of hanging.
pub async fn bounded<T, F>(deadline: Option<Duration>, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match deadline {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(limit)),
        },
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_through_without_deadline() {
        let result = bounded(None, async { Ok::<_, StoreError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_bounded_returns_value_within_deadline() {
        let result = bounded(Some(Duration::from_secs(1)), async {
            Ok::<_, StoreError>("fast")
        })
        .await;
        assert_eq!(result.unwrap(), "fast");
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out_slow_read() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, StoreError>(1)
        };
        let result = bounded(Some(Duration::from_millis(100)), slow).await;
        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }
}

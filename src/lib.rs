// Delivery Zone & Promotion Pricing Engine
//
// Two engines with real algorithmic content, everything else injected:
// - Zone resolution: decides whether an address is deliverable from a
//   business and at what price, via mode-specific strategies with a
//   distance-capped fallback estimator.
// - Promotion pricing: applies the single best active promotion detail to
//   each order line and derives the discounted cost.
// A cost aggregator combines both outputs into order totals.
//
// Persistence, HTTP transport, auth, and provider integrations live in the
// surrounding system and reach the engines only through the store traits.

pub mod config;
pub mod delivery;
pub mod error;
pub mod geo;
pub mod models;
pub mod orders;
pub mod promotions;
pub mod stores;
pub mod validation;


// Re-export commonly used types for convenience
pub use config::{DeliveryConfig, DistancePricing, FallbackPricing};
pub use delivery::{
    DeliveryArea, DeliveryRate, DeliveryResult, DeliveryType, FallbackEstimator, PickupArea,
    ZoneResolver,
};
pub use error::{EngineError, EngineResult, StoreError};
pub use geo::haversine_distance;
pub use models::{Business, City, Coordinate, DeliveryMode};
pub use orders::{CostAggregator, OrderTotals};
pub use promotions::{
    OrderLineItem, Promotion, PromotionDetail, PromotionDetailType, PromotionEngine,
    PromotionOutcome,
};
pub use stores::{
    AreaStore, BusinessStore, CityStore, GeometryOracle, PromotionStore, RateStore,
};

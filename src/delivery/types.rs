// Delivery pricing domain types
//
// Rates and areas are administrative configuration read from the stores;
// `DeliveryResult` is the single ephemeral output of a zone resolution.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Per-city rate row for distance-mode pricing
///
/// Both fields are optional; absence triggers the configured defaults
/// (30 km cap, tiered base-plus-surcharge pricing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRate {
    pub city_id: i32,
    /// Maximum serviceable straight-line distance, in kilometers
    pub base_distance_km: Option<f64>,
    /// Flat price for any delivery under the cap, overriding tiered pricing
    pub base_distance_price: Option<Decimal>,
}

/// Region grouping businesses that share delivery-area price tiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupArea {
    pub id: i32,
    pub polygon: i32,
}

/// Priced sub-region of a pickup area
///
/// Multiple delivery areas of one pickup area may overlap; the cheapest
/// one containing the destination wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryArea {
    pub id: i32,
    pub pickup_area_id: i32,
    pub polygon: i32,
    pub price: Decimal,
}

/// Which pricing path produced a delivery result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    Distance,
    Area,
    Fallback,
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryType::Distance => write!(f, "distance"),
            DeliveryType::Area => write!(f, "area"),
            DeliveryType::Fallback => write!(f, "fallback"),
        }
    }
}

/// Outcome of a zone resolution
///
/// Always produced for a well-formed coordinate; non-serviceable addresses
/// surface as `in_zone: false` with a human-readable `message`, never as an
/// error. Serializes to the wire shape consumed by the order and address
/// controllers: `price` becomes the JSON literal `false` when absent.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryResult {
    pub in_zone: bool,
    #[serde(serialize_with = "serialize_price_or_false")]
    pub price: Option<Decimal>,
    pub delivery_type: DeliveryType,
    pub message: String,
    /// Cap that applied during the distance check, meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,
    /// Measured straight-line distance to the business, meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_distance: Option<f64>,
}

/// Serializes `Some(price)` as a JSON number and `None` as `false`,
/// matching the legacy wire contract.
fn serialize_price_or_false<S>(price: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match price {
        Some(p) => {
            if p.fract().is_zero() {
                match p.to_i64() {
                    Some(whole) => serializer.serialize_i64(whole),
                    None => serde::Serialize::serialize(p, serializer),
                }
            } else {
                match p.to_f64() {
                    Some(value) => serializer.serialize_f64(value),
                    None => serde::Serialize::serialize(p, serializer),
                }
            }
        }
        None => serializer.serialize_bool(false),
    }
}

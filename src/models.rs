// Core domain entities shared by the delivery and promotion engines
//
// All entities here are read-only inputs fetched once per calculation;
// the engines never mutate them.

use crate::error::{EngineError, EngineResult};
use crate::validation::{validate_latitude, validate_longitude};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

/// A WGS84 latitude/longitude pair in degrees.
///
/// Invariant: both components are finite and in range before any zone
/// resolution runs. Construct through [`Coordinate::new`] to enforce this;
/// deserialized values should be checked with `validate()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Validate for Coordinate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if validate_latitude(self.lat).is_err() {
            errors.add("lat", ValidationError::new("latitude_out_of_range"));
        }
        if validate_longitude(self.lon).is_err() {
            errors.add("lon", ValidationError::new("longitude_out_of_range"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Coordinate {
    /// Create a validated coordinate
    ///
    /// # Errors
    /// Returns `EngineError::InvalidCoordinate` when either component is
    /// non-finite or out of range.
    pub fn new(lat: f64, lon: f64) -> EngineResult<Self> {
        validate_latitude(lat).map_err(|_| {
            EngineError::InvalidCoordinate(format!("latitude {} outside [-90, 90]", lat))
        })?;
        validate_longitude(lon).map_err(|_| {
            EngineError::InvalidCoordinate(format!("longitude {} outside [-180, 180]", lon))
        })?;
        Ok(Self { lat, lon })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// A business with a fixed pickup location
///
/// Immutable for pricing purposes; the location anchors both the distance
/// calculation and the pickup-area containment test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: i32,
    pub coordinate: Coordinate,
    pub city_id: i32,
}

/// How a city prices its deliveries
///
/// Selects the resolver strategy. Cities with no configured mode fall
/// straight through to the fallback estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Straight-line distance from the business, capped and priced per km
    Distance,

    /// Nested pickup/delivery area polygons with flat per-area prices
    Area,

    /// No usable configuration; fallback pricing only
    #[serde(other)]
    Unknown,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Distance => write!(f, "distance"),
            DeliveryMode::Area => write!(f, "area"),
            DeliveryMode::Unknown => write!(f, "unknown"),
        }
    }
}

/// A city with its delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub id: i32,
    pub delivery_mode: DeliveryMode,
    /// Polygon id of the city border, resolvable through the geometry oracle.
    /// Absent borders make the distance strategy inconclusive.
    pub border_polygon: Option<i32>,
}

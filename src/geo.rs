// Great-circle distance calculation
//
// The engine needs straight-line distances only; routing distance is the
// courier dispatcher's problem.

use crate::models::Coordinate;

/// Mean Earth radius in meters, spherical approximation
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two coordinates, in meters.
///
/// Accurate to well under 0.5% for city-scale distances, which is far
/// tighter than the pricing tiers it feeds.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    // Float drift can push h past 1.0 for near-antipodal points; clamp so
    // asin stays defined.
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

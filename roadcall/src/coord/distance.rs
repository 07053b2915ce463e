//! Great-circle distance between coordinates.
//!
//! Uses the haversine formula on a spherical earth model, which is accurate
//! to well under a percent over the short distances the dispatch core cares
//! about (candidate search radii and the completion threshold). Numerical
//! stability near antipodal points is not a requirement of this domain.

use std::f64::consts::PI;

use super::types::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// Calculate the great-circle distance between two positions, in meters.
///
/// Uses the haversine formula. The result is symmetric in its arguments and
/// zero exactly when both coordinates are equal.
///
/// # Example
///
/// ```
/// use roadcall::coord::{distance_meters, Coordinate};
///
/// // Distance from equator, prime meridian to 1 degree north
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let b = Coordinate::new(1.0, 0.0).unwrap();
/// let dist = distance_meters(&a, &b);
/// assert!((dist - 111_195.0).abs() < 100.0); // 1 degree = ~111.2 km
/// ```
pub fn distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    if from == to {
        return 0.0;
    }

    let lat1_rad = from.latitude() * DEG_TO_RAD;
    let lat2_rad = to.latitude() * DEG_TO_RAD;
    let delta_lat = (to.latitude() - from.latitude()) * DEG_TO_RAD;
    let delta_lon = (to.longitude() - from.longitude()) * DEG_TO_RAD;

    // Haversine formula
    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

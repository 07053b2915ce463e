//! Geographic coordinate types and distance math.
//!
//! The [`Coordinate`] type carries the validated (latitude, longitude) pair
//! used everywhere in the dispatch core, and [`distance_meters`] computes the
//! great-circle distance used both for candidate ranking and for the
//! completion-trigger evaluation.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Distance: meters

mod distance;
mod types;

pub use distance::{distance_meters, EARTH_RADIUS_M};
pub use types::{Coordinate, CoordError, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

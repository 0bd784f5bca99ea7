//! Geographic primitives: validated points and bounding regions.
//!
//! Everything in the engine that touches a latitude or longitude goes
//! through [`GeoPoint`], so invalid coordinates are rejected at the edge
//! rather than surfacing as NaN camera positions later.

mod types;

pub use types::{GeoBounds, GeoError, GeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

#[cfg(test)]
mod tests;

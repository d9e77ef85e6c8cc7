//! Great-circle distance estimator (fallback when no precise service answers).
//!
//! Less accurate than a road-network service but always available.

use crate::coordinate::Coordinate;
use crate::matrix::{DistanceMatrix, MatrixSource};
use crate::traits::DistanceSource;

/// Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Haversine distance between two points in miles.
pub fn haversine_miles(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// Distance source built purely from coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineSource;

impl DistanceSource for HaversineSource {
    fn matrix(&self, origins: &[Coordinate], destinations: &[Coordinate]) -> DistanceMatrix {
        DistanceMatrix::from_fn(
            origins.len(),
            destinations.len(),
            MatrixSource::Geometric,
            |i, j| haversine_miles(origins[i], destinations[j]),
        )
    }
}

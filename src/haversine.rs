//! Haversine distance matrix provider.
//!
//! Great-circle distance between collection points. The default distance
//! source of the route builder, and the fallback when OSRM is unavailable.

use rayon::prelude::*;

use crate::traits::DistanceMatrixProvider;

/// Average driving speed the route builder assumes unless configured.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate haversine distance between two points in kilometers.
///
/// Symmetric, and zero when both positions are identical.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine-based distance matrix provider, in kilometres.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineMatrix;

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<f64>> {
        locations
            .par_iter()
            .enumerate()
            .map(|(i, from)| {
                locations
                    .iter()
                    .enumerate()
                    .map(|(j, to)| if i == j { 0.0 } else { haversine_km(*from, *to) })
                    .collect::<Vec<f64>>()
            })
            .collect()
    }
}

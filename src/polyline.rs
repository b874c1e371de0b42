//! Route geometry for map rendering.
//!
//! A route is drawn as straight segments between its stops. Encoding to a
//! compact polyline or GeoJSON happens in whatever renders the map.

use serde::{Deserialize, Serialize};

use crate::haversine::haversine_km;
use crate::solver::Route;

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

/// South-west and north-east corners, each (lat, lon).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: (f64, f64),
    pub north_east: (f64, f64),
}

impl Bounds {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south_west.0 + self.north_east.0) / 2.0,
            (self.south_west.1 + self.north_east.1) / 2.0,
        )
    }
}

impl Polyline {
    /// Each point is a (latitude, longitude) tuple.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Stop coordinates of a route, depot to depot.
    pub fn from_route(route: &Route) -> Self {
        Self::new(route.points.iter().map(|point| point.location()).collect())
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    /// Great-circle length of all segments in kilometres.
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|segment| haversine_km(segment[0], segment[1]))
            .sum()
    }

    /// `None` for an empty polyline.
    pub fn bounds(&self) -> Option<Bounds> {
        let (first, rest) = self.points.split_first()?;
        let bounds = rest.iter().fold(
            Bounds {
                south_west: *first,
                north_east: *first,
            },
            |acc, &(lat, lon)| Bounds {
                south_west: (acc.south_west.0.min(lat), acc.south_west.1.min(lon)),
                north_east: (acc.north_east.0.max(lat), acc.north_east.1.max(lon)),
            },
        );
        Some(bounds)
    }
}

//! Seams between the route builder and its collaborators.

use serde::{Deserialize, Serialize};

/// Provides a distance matrix (kilometres) for a set of locations.
///
/// The matrix is indexed by the provided location order. Entry `[i][j]` is the
/// distance of the leg from location `i` to location `j`; it need not equal
/// `[j][i]`.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<f64>>;
}

impl<M: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for &M {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<f64>> {
        (**self).matrix_for(locations)
    }
}

impl<M: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for Box<M> {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<f64>> {
        (**self).matrix_for(locations)
    }
}

/// Why a collection point ended up in no route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnassignedReason {
    /// Demand is larger than every vehicle's capacity.
    ExceedsFleetCapacity,
    /// Some vehicle could carry it, but none had room left.
    FleetExhausted,
    /// Strict windows: no vehicle could arrive before the window closed.
    NoFeasibleWindow,
}

/// Whether time windows influence stop selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeWindowPolicy {
    /// Windows are recorded and reported, never enforced.
    #[default]
    Advisory,
    /// A stop is only eligible if the vehicle reaches it before its window
    /// closes; early arrivals wait for the window to open.
    Strict,
}

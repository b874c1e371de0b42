//! Simulated traffic as a seeded perturbation of leg distances.
//!
//! Distance computation itself stays deterministic. `TrafficFactor` wraps a
//! provider and scales each leg by its own random factor, so the perturbed
//! matrix is generally not symmetric. The generator is reseeded on every
//! call: the same seed and locations always give the same matrix.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::traits::DistanceMatrixProvider;

pub const DEFAULT_MIN_FACTOR: f64 = 0.95;
pub const DEFAULT_MAX_FACTOR: f64 = 1.15;

#[derive(Debug, Clone)]
pub struct TrafficFactor<M> {
    inner: M,
    seed: u64,
    min: f64,
    max: f64,
}

impl<M> TrafficFactor<M> {
    pub fn new(inner: M, seed: u64) -> Self {
        Self {
            inner,
            seed,
            min: DEFAULT_MIN_FACTOR,
            max: DEFAULT_MAX_FACTOR,
        }
    }

    /// Replace the factor range. The bounds are ordered if given reversed.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min.min(max);
        self.max = max.max(min);
        self
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl<M: DistanceMatrixProvider> DistanceMatrixProvider for TrafficFactor<M> {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<f64>> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut matrix = self.inner.matrix_for(locations);
        for (i, row) in matrix.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                if i != j {
                    *value *= rng.random_range(self.min..=self.max);
                }
            }
        }
        matrix
    }
}

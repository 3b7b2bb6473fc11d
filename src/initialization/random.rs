use rand::Rng;
use rand_distr::{Distribution, Uniform};

use super::WeightGen;
use crate::Result;

/// A weight generator that follows a certain probabilistic distribution.
pub struct RandWeightGen<R: Rng, D: Distribution<f64>> {
    rng: R,
    distribution: D,
    remaining: usize,
}

impl<R: Rng, D: Distribution<f64>> RandWeightGen<R, D> {
    /// Creates a new `RandWeightGen` weight generator.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `distribution` - The distribution to sample the random numbers from.
    /// * `limit` - The maximum amount of numbers to generate.
    pub fn new(rng: R, distribution: D, limit: usize) -> Self {
        Self {
            rng,
            distribution,
            remaining: limit,
        }
    }
}

impl<R: Rng> RandWeightGen<R, Uniform<f64>> {
    /// Creates a new `RandWeightGen` weight generator with an inclusive uniform distribution.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `low` - The inclusive lower limit.
    /// * `high` - The inclusive upper limit.
    ///
    /// # Returns
    /// An error if the range is invalid (low > high or not finite).
    pub fn uniform_inclusive(rng: R, limit: usize, low: f64, high: f64) -> Result<Self> {
        Ok(Self::new(rng, Uniform::new_inclusive(low, high)?, limit))
    }
}

impl<R: Rng, D: Distribution<f64>> WeightGen for RandWeightGen<R, D> {
    fn sample(&mut self, mut n: usize) -> Option<Vec<f64>> {
        if self.remaining == 0 {
            return None;
        }

        n = n.min(self.remaining);
        self.remaining -= n;

        let sample = (0..n)
            .map(|_| self.distribution.sample(&mut self.rng))
            .collect();

        Some(sample)
    }
}

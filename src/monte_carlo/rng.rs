//! Seeded random number generator shared by a sweep.
//!
//! One `MonteCarloRng` is created per sweep and threaded by `&mut` through
//! the estimator into every trial. Nothing else in the engine draws random
//! numbers, so a fixed seed reproduces a sweep bit for bit.

use crate::error::{ReidentError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reproducible random source for Monte Carlo trials.
#[derive(Debug, Clone)]
pub struct MonteCarloRng {
    rng: StdRng,
    seed: u64,
}

impl MonteCarloRng {
    /// Creates a generator from a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates a generator with a seed drawn from OS entropy.
    ///
    /// The drawn seed is kept so the run can be logged and replayed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this generator was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw from `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Standard normal draw (Box-Muller).
    pub fn standard_normal(&mut self) -> f64 {
        // 1 - U lies in (0, 1], keeping ln finite
        let u1 = 1.0 - self.uniform();
        let u2 = self.uniform();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Normal draw with the given mean and standard deviation.
    pub fn normal(&mut self, mean: f64, std: f64) -> f64 {
        mean + std * self.standard_normal()
    }

    /// Uniform index in `[0, upper)`.
    ///
    /// # Panics
    ///
    /// Panics if `upper == 0`.
    pub fn index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }

    /// Draws `amount` distinct indices from `0..population`, uniformly and
    /// without replacement, in draw order.
    ///
    /// # Errors
    ///
    /// Returns [`ReidentError::InsufficientPopulation`] if
    /// `amount > population`.
    pub fn sample_without_replacement(
        &mut self,
        population: usize,
        amount: usize,
    ) -> Result<Vec<usize>> {
        if amount > population {
            return Err(ReidentError::InsufficientPopulation {
                requested: amount,
                available: population,
            });
        }
        Ok(rand::seq::index::sample(&mut self.rng, population, amount).into_vec())
    }
}

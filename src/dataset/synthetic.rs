//! Gaussian synthetic populations for tests, benchmarks, and demos.

use super::{Population, UserRecords};
use crate::error::{ReidentError, Result};
use crate::monte_carlo::MonteCarloRng;
use crate::primitives::Matrix;

/// Generator of per-user Gaussian clusters.
///
/// Each user gets a center drawn from `N(0, separation²)` per feature, and
/// every row of that user is the center plus `N(0, noise²)` noise. Larger
/// `separation / noise` makes users easier to tell apart.
///
/// # Example
///
/// ```
/// use reident::dataset::SyntheticPopulation;
/// use reident::monte_carlo::MonteCarloRng;
///
/// let mut rng = MonteCarloRng::new(42);
/// let population = SyntheticPopulation::new(5, 10)
///     .with_n_features(2)
///     .population(&mut rng)
///     .expect("valid generator settings");
///
/// assert_eq!(population.len(), 5);
/// assert_eq!(population.block(0).shape(), (10, 2));
/// assert_eq!(population.query(0).shape(), (1, 2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticPopulation {
    n_users: usize,
    n_samples: usize,
    n_query: usize,
    n_features: usize,
    separation: f64,
    noise: f64,
}

impl SyntheticPopulation {
    /// `n_users` users with `n_samples` training rows each, one query row,
    /// one feature, unit separation and unit noise.
    #[must_use]
    pub fn new(n_users: usize, n_samples: usize) -> Self {
        Self {
            n_users,
            n_samples,
            n_query: 1,
            n_features: 1,
            separation: 1.0,
            noise: 1.0,
        }
    }

    /// Sets the number of query rows per user.
    #[must_use]
    pub fn with_n_query(mut self, n_query: usize) -> Self {
        self.n_query = n_query;
        self
    }

    /// Sets the feature dimensionality.
    #[must_use]
    pub fn with_n_features(mut self, n_features: usize) -> Self {
        self.n_features = n_features;
        self
    }

    /// Sets the standard deviation of user centers.
    #[must_use]
    pub fn with_separation(mut self, separation: f64) -> Self {
        self.separation = separation;
        self
    }

    /// Sets the within-user noise standard deviation.
    #[must_use]
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.n_samples == 0 {
            return Err(ReidentError::invalid_hyperparameter("n_samples", 0, ">= 1"));
        }
        if self.n_features == 0 {
            return Err(ReidentError::invalid_hyperparameter("n_features", 0, ">= 1"));
        }
        for (name, value) in [("separation", self.separation), ("noise", self.noise)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ReidentError::invalid_hyperparameter(name, value, "finite and >= 0"));
            }
        }
        Ok(())
    }

    /// Draws one user's rows: `n_rows` samples around a fresh center.
    fn draw_user(&self, n_rows: usize, rng: &mut MonteCarloRng) -> Result<Matrix<f32>> {
        let center: Vec<f64> = (0..self.n_features)
            .map(|_| rng.normal(0.0, self.separation))
            .collect();
        let mut data = Vec::with_capacity(n_rows * self.n_features);
        for _ in 0..n_rows {
            for &c in &center {
                data.push(rng.normal(c, self.noise) as f32);
            }
        }
        Matrix::from_vec(n_rows, self.n_features, data).map_err(Into::into)
    }

    /// Raw records with `n_samples + n_query` ordered rows per user.
    ///
    /// # Errors
    ///
    /// Returns [`ReidentError::InvalidHyperparameter`] for zero sizes or
    /// negative spreads.
    pub fn records(&self, rng: &mut MonteCarloRng) -> Result<UserRecords> {
        self.validate()?;
        let users = (0..self.n_users)
            .map(|_| self.draw_user(self.n_samples + self.n_query, rng))
            .collect::<Result<_>>()?;
        UserRecords::new(users)
    }

    /// Population with `n_samples` training rows and `n_query` query rows
    /// per user, both drawn around the same center.
    ///
    /// # Errors
    ///
    /// Returns [`ReidentError::InvalidHyperparameter`] for zero sizes or
    /// negative spreads.
    pub fn population(&self, rng: &mut MonteCarloRng) -> Result<Population> {
        self.validate()?;
        if self.n_query == 0 {
            return Err(ReidentError::invalid_hyperparameter("n_query", 0, ">= 1"));
        }

        let mut x_data = Vec::with_capacity(self.n_users);
        let mut y_data = Vec::with_capacity(self.n_users);
        for _ in 0..self.n_users {
            let rows = self.draw_user(self.n_samples + self.n_query, rng)?;
            let train: Vec<usize> = (0..self.n_samples).collect();
            let query: Vec<usize> = (self.n_samples..self.n_samples + self.n_query).collect();
            x_data.push(rows.select_rows(&train));
            y_data.push(rows.select_rows(&query));
        }
        Population::new(x_data, y_data)
    }
}

//! Per-user feature data consumed by the Monte Carlo engine.
//!
//! A [`Population`] pairs every user's training block (`x_data`) with that
//! user's held-out query rows (`y_data`). [`UserRecords`] keeps the raw,
//! ordered rows per user and produces fresh populations for any
//! train/test fraction, which is what the split-fraction sweep needs.
//!
//! # Example
//!
//! ```
//! use reident::dataset::UserRecords;
//! use reident::prelude::*;
//!
//! let alice = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("4x1");
//! let bob = Matrix::from_vec(4, 1, vec![5.0, 6.0, 7.0, 8.0]).expect("4x1");
//! let records = UserRecords::new(vec![alice, bob]).expect("consistent widths");
//!
//! let population = records.split(0.5, 0.25).expect("valid fractions");
//! assert_eq!(population.block(0).n_rows(), 2);
//! assert_eq!(population.query(1).as_slice(), &[8.0]);
//! ```

mod synthetic;

pub use synthetic::SyntheticPopulation;

use crate::error::{ReidentError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Training blocks and query rows for every user, index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    x_data: Vec<Matrix<f32>>,
    y_data: Vec<Matrix<f32>>,
    n_features: usize,
}

impl Population {
    /// Builds a population from per-user training blocks and query rows.
    ///
    /// # Errors
    ///
    /// - [`ReidentError::DimensionMismatch`] if the two lists differ in
    ///   length or any matrix differs in feature width
    /// - an error if any block or query has no rows
    pub fn new(x_data: Vec<Matrix<f32>>, y_data: Vec<Matrix<f32>>) -> Result<Self> {
        if x_data.len() != y_data.len() {
            return Err(ReidentError::dimension_mismatch(
                "users in x_data/y_data",
                x_data.len(),
                y_data.len(),
            ));
        }

        let n_features = x_data.first().map_or(0, Matrix::n_cols);
        for (user, (block, query)) in x_data.iter().zip(&y_data).enumerate() {
            if block.n_rows() == 0 {
                return Err(format!("user {user} has an empty training block").into());
            }
            if query.n_rows() == 0 {
                return Err(format!("user {user} has no query rows").into());
            }
            for m in [block, query] {
                if m.n_cols() != n_features {
                    return Err(ReidentError::dimension_mismatch(
                        "features",
                        n_features,
                        m.n_cols(),
                    ));
                }
            }
        }

        Ok(Self {
            x_data,
            y_data,
            n_features,
        })
    }

    /// Number of users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x_data.len()
    }

    /// True if the population has no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x_data.is_empty()
    }

    /// Feature dimensionality D shared by every row.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Training block of `user`.
    ///
    /// # Panics
    ///
    /// Panics if `user >= self.len()`.
    #[must_use]
    pub fn block(&self, user: usize) -> &Matrix<f32> {
        &self.x_data[user]
    }

    /// Query rows of `user`.
    ///
    /// # Panics
    ///
    /// Panics if `user >= self.len()`.
    #[must_use]
    pub fn query(&self, user: usize) -> &Matrix<f32> {
        &self.y_data[user]
    }

    /// All training blocks.
    #[must_use]
    pub fn blocks(&self) -> &[Matrix<f32>] {
        &self.x_data
    }

    /// All query matrices.
    #[must_use]
    pub fn queries(&self) -> &[Matrix<f32>] {
        &self.y_data
    }
}

/// Raw, ordered feature rows per user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecords {
    users: Vec<Matrix<f32>>,
}

impl UserRecords {
    /// Wraps per-user row matrices.
    ///
    /// # Errors
    ///
    /// Returns [`ReidentError::DimensionMismatch`] if users differ in
    /// feature width.
    pub fn new(users: Vec<Matrix<f32>>) -> Result<Self> {
        if let Some(first) = users.first() {
            let width = first.n_cols();
            if let Some(bad) = users.iter().find(|u| u.n_cols() != width) {
                return Err(ReidentError::dimension_mismatch("features", width, bad.n_cols()));
            }
        }
        Ok(Self { users })
    }

    /// Number of users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// True if there are no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Rows of one user.
    #[must_use]
    pub fn user(&self, idx: usize) -> &Matrix<f32> {
        &self.users[idx]
    }

    /// Feature width, 0 when empty.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.users.first().map_or(0, Matrix::n_cols)
    }

    /// Holdout split with training fraction `p` and test fraction `q`.
    ///
    /// A user with `n` rows gets its first `max(1, round(p·n))` rows as the
    /// training block and its last `max(1, round(q·n))` rows as the query.
    /// When rounding alone makes the two overlap, the training block is
    /// shortened so it ends where the query begins.
    ///
    /// # Errors
    ///
    /// - [`ReidentError::InvalidHyperparameter`] if `p` or `q` is outside
    ///   `(0, 1]`, or `p + q > 1`
    /// - an error if a user has fewer than two rows
    pub fn split(&self, p: f64, q: f64) -> Result<Population> {
        for (name, value) in [("p", p), ("q", q)] {
            if !(value.is_finite() && value > 0.0 && value <= 1.0) {
                return Err(ReidentError::invalid_hyperparameter(name, value, "in (0, 1]"));
            }
        }
        if p + q > 1.0 + FRACTION_TOLERANCE {
            return Err(ReidentError::invalid_hyperparameter(
                "p + q",
                p + q,
                "<= 1 (train and test rows must not overlap)",
            ));
        }

        let mut x_data = Vec::with_capacity(self.users.len());
        let mut y_data = Vec::with_capacity(self.users.len());
        for (idx, rows) in self.users.iter().enumerate() {
            let n = rows.n_rows();
            if n < 2 {
                return Err(format!(
                    "user {idx} has {n} rows, a holdout split needs at least 2"
                )
                .into());
            }
            let n_test = fraction_count(q, n).min(n - 1);
            let n_train = fraction_count(p, n).min(n - n_test);

            let train: Vec<usize> = (0..n_train).collect();
            let test: Vec<usize> = (n - n_test..n).collect();
            x_data.push(rows.select_rows(&train));
            y_data.push(rows.select_rows(&test));
        }

        Population::new(x_data, y_data)
    }
}

/// Slack allowed on `p + q` for fractions produced by float stepping.
const FRACTION_TOLERANCE: f64 = 1e-9;

/// `max(1, round(fraction · n))`.
fn fraction_count(fraction: f64, n: usize) -> usize {
    ((fraction * n as f64).round() as usize).max(1)
}

/// Which fraction the split sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitScope {
    /// Vary the training fraction; the test fraction stays fixed
    #[default]
    Train,
    /// Vary the test fraction; the training fraction stays fixed
    Test,
}

impl std::fmt::Display for SplitScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Train => write!(f, "train"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Produces a fresh population for a swept fraction.
pub trait Partitioner {
    /// Re-partitions the raw data at `fraction`.
    ///
    /// # Errors
    ///
    /// Returns an error if the fraction cannot be applied to the data.
    fn partition(&self, fraction: f64) -> Result<Population>;
}

/// Holdout partitioner over [`UserRecords`].
///
/// With [`SplitScope::Train`] the swept fraction is the training fraction
/// and `fixed_fraction` the test fraction; [`SplitScope::Test`] swaps them.
#[derive(Debug, Clone, Copy)]
pub struct HoldoutPartitioner<'a> {
    records: &'a UserRecords,
    scope: SplitScope,
    fixed_fraction: f64,
}

impl<'a> HoldoutPartitioner<'a> {
    /// Creates a partitioner over `records`.
    #[must_use]
    pub fn new(records: &'a UserRecords, scope: SplitScope, fixed_fraction: f64) -> Self {
        Self {
            records,
            scope,
            fixed_fraction,
        }
    }

    /// The swept side of the split.
    #[must_use]
    pub fn scope(&self) -> SplitScope {
        self.scope
    }
}

impl Partitioner for HoldoutPartitioner<'_> {
    fn partition(&self, fraction: f64) -> Result<Population> {
        match self.scope {
            SplitScope::Train => self.records.split(fraction, self.fixed_fraction),
            SplitScope::Test => self.records.split(self.fixed_fraction, fraction),
        }
    }
}

#[cfg(test)]
#[path = "dataset_tests.rs"]
mod tests;

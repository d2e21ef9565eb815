//! Core traits for re-identification oracles.
//!
//! The Monte Carlo engine never names a concrete algorithm. It asks a
//! [`ClassifierFactory`] for a fresh [`Classifier`] every trial, fits it on
//! the pooled training matrix, and asks it to label the query rows.

use crate::error::Result;
use crate::primitives::Matrix;

/// Multi-class classifier used as a re-identification oracle.
///
/// Labels are user positions within the candidate pool, `0..N`.
///
/// # Examples
///
/// ```
/// use reident::classification::KNearestNeighbors;
/// use reident::prelude::*;
///
/// let x = Matrix::from_vec(4, 1, vec![0.0, 0.1, 5.0, 5.1]).unwrap();
/// let y = vec![0, 0, 1, 1];
///
/// let mut knn = KNearestNeighbors::new(1);
/// knn.fit(&x, &y).unwrap();
/// let query = Matrix::from_vec(1, 1, vec![4.9]).unwrap();
/// assert_eq!(knn.predict(&query).unwrap(), vec![1]);
/// ```
pub trait Classifier {
    /// Fits the classifier to labeled rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is malformed for this algorithm
    /// (row/label count mismatch, empty input, invalid hyperparameters).
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()>;

    /// Predicts one label per row of `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the feature width
    /// differs from the training data.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>>;
}

/// Builds independent classifier instances, one per trial.
///
/// Implemented by [`crate::config::ClassifierConfig`] for the built-in
/// families; tests and callers can implement it for their own oracles.
pub trait ClassifierFactory {
    /// Human-readable name used in logs, errors, and result labels.
    fn name(&self) -> String;

    /// Creates a new, unfitted classifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    fn build(&self) -> Result<Box<dyn Classifier>>;
}

impl<F: ClassifierFactory + ?Sized> ClassifierFactory for &F {
    fn name(&self) -> String {
        (**self).name()
    }

    fn build(&self) -> Result<Box<dyn Classifier>> {
        (**self).build()
    }
}

//! Classification algorithms used as re-identification oracles.
//!
//! This module implements:
//! - K-Nearest Neighbors (kNN) for instance-based classification
//! - Kernel Support Vector Machine (one-vs-rest) for maximum-margin classification
//! - Kernel Density classifier for density-based (generative) classification
//!
//! Every classifier implements [`Classifier`] and breaks ties between
//! equally scored labels toward the lowest label.
//!
//! # Example
//!
//! ```
//! use reident::classification::KNearestNeighbors;
//! use reident::prelude::*;
//!
//! let x = Matrix::from_vec(4, 2, vec![
//!     0.0, 0.0,
//!     0.0, 1.0,
//!     9.0, 9.0,
//!     9.0, 8.0,
//! ]).expect("Matrix dimensions match data length");
//! let y = vec![0, 0, 1, 1];
//!
//! let mut knn = KNearestNeighbors::new(1);
//! knn.fit(&x, &y).expect("Training data is valid with 4 samples");
//! let predictions = knn.predict(&x).expect("Model is fitted");
//! assert_eq!(predictions, y);
//! ```

mod kde;
mod svm;

pub use kde::KernelDensityClassifier;
pub use svm::{KernelSvm, SvmKernel};

use crate::error::{ReidentError, Result};
use crate::monte_carlo::majority_vote;
use crate::primitives::{squared_euclidean, Matrix};
use crate::traits::Classifier;
use serde::{Deserialize, Serialize};

/// Distance metric for K-Nearest Neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Euclidean distance: `sqrt(sum((x_i` - `y_i)^2`))
    #[default]
    Euclidean,
    /// Manhattan distance: `sum(|x_i` - `y_i`|)
    Manhattan,
    /// Minkowski distance with parameter p
    Minkowski(f32),
}

/// K-Nearest Neighbors classifier.
///
/// Instance-based learning algorithm that classifies new samples based on
/// the k closest training examples in the feature space.
///
/// # Example
///
/// ```
/// use reident::classification::{KNearestNeighbors, DistanceMetric};
/// use reident::prelude::*;
///
/// let x = Matrix::from_vec(6, 2, vec![
///     0.0, 0.0,  // class 0
///     0.0, 1.0,  // class 0
///     1.0, 0.0,  // class 0
///     5.0, 5.0,  // class 1
///     5.0, 6.0,  // class 1
///     6.0, 5.0,  // class 1
/// ]).expect("6x2 matrix with 12 values");
/// let y = vec![0, 0, 0, 1, 1, 1];
///
/// let mut knn = KNearestNeighbors::new(3).with_metric(DistanceMetric::Manhattan);
/// knn.fit(&x, &y).expect("Valid training data with 6 samples");
///
/// let test = Matrix::from_vec(1, 2, vec![0.5, 0.5]).expect("1x2 test matrix");
/// let predictions = knn.predict(&test).expect("Predict should succeed");
/// assert_eq!(predictions[0], 0);  // Closer to class 0
/// ```
#[derive(Debug, Clone)]
pub struct KNearestNeighbors {
    /// Number of neighbors to use
    k: usize,
    /// Distance metric
    metric: DistanceMetric,
    /// Whether to use weighted voting (inverse distance)
    weights: bool,
    /// Training feature matrix (stored during fit)
    x_train: Option<Matrix<f32>>,
    /// Training labels (stored during fit)
    y_train: Option<Vec<usize>>,
}

impl KNearestNeighbors {
    /// Creates a new K-Nearest Neighbors classifier.
    ///
    /// # Arguments
    ///
    /// * `k` - Number of neighbors to use for voting
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            metric: DistanceMetric::Euclidean,
            weights: false,
            x_train: None,
            y_train: None,
        }
    }

    /// Sets the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Enables weighted voting (inverse distance weighting).
    #[must_use]
    pub fn with_weights(mut self, weights: bool) -> Self {
        self.weights = weights;
        self
    }

    /// Returns the number of neighbors.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Computes distance between two samples.
    fn compute_distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.metric {
            DistanceMetric::Euclidean => squared_euclidean(a, b).sqrt() as f32,
            DistanceMetric::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
            DistanceMetric::Minkowski(p) => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y).abs().powf(p))
                .sum::<f32>()
                .powf(1.0 / p),
        }
    }

    /// Performs weighted voting (inverse distance weighting).
    ///
    /// Labels are visited in ascending order so equal weights resolve to
    /// the lowest label.
    fn weighted_vote(neighbors: &[(f32, usize)]) -> Option<usize> {
        let mut class_weights = std::collections::BTreeMap::new();

        for (dist, label) in neighbors {
            let weight = if *dist < 1e-10 { 1.0 } else { 1.0 / dist };
            *class_weights.entry(*label).or_insert(0.0_f32) += weight;
        }

        let mut best: Option<(usize, f32)> = None;
        for (label, weight) in class_weights {
            if best.map_or(true, |(_, w)| weight > w) {
                best = Some((label, weight));
            }
        }
        best.map(|(label, _)| label)
    }
}

impl Classifier for KNearestNeighbors {
    /// Fits the model by storing the training data.
    ///
    /// kNN is a lazy learner - it simply stores the training data
    /// and defers computation until prediction time.
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let (n_samples, _n_features) = x.shape();

        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        if y.len() != n_samples {
            return Err("Number of samples in X and y must match".into());
        }

        if self.k == 0 {
            return Err(ReidentError::invalid_hyperparameter("n_neighbors", 0, ">= 1"));
        }

        if self.k > n_samples {
            return Err("k cannot be larger than number of training samples".into());
        }

        self.x_train = Some(x.clone());
        self.y_train = Some(y.to_vec());

        Ok(())
    }

    /// For each test sample, finds the k nearest training samples
    /// and returns the majority class.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let x_train = self.x_train.as_ref().ok_or("Model not fitted")?;
        let y_train = self.y_train.as_ref().ok_or("Model not fitted")?;

        if x.n_cols() != x_train.n_cols() {
            return Err(ReidentError::dimension_mismatch(
                "features",
                x_train.n_cols(),
                x.n_cols(),
            ));
        }

        let mut predictions = Vec::with_capacity(x.n_rows());

        for sample in x.rows() {
            let mut distances: Vec<(f32, usize)> = x_train
                .rows()
                .zip(y_train)
                .map(|(train_row, &label)| (self.compute_distance(sample, train_row), label))
                .collect();

            // Stable sort keeps training order among equidistant neighbors
            distances.sort_by(|a, b| a.0.total_cmp(&b.0));
            let k_nearest = &distances[..self.k];

            let predicted_class = if self.weights {
                Self::weighted_vote(k_nearest)
            } else {
                let labels: Vec<usize> = k_nearest.iter().map(|(_, label)| *label).collect();
                majority_vote(&labels)
            };

            predictions.push(predicted_class.ok_or("Neighbors slice is empty")?);
        }

        Ok(predictions)
    }
}

/// Returns the index of the largest score; ties go to the lowest index.
pub(crate) fn argmax_lowest(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Number of classes implied by a label vector (`max + 1`).
pub(crate) fn n_classes(y: &[usize]) -> usize {
    y.iter().max().map_or(0, |m| m + 1)
}

#[cfg(test)]
mod tests;

#[cfg(test)]
#[path = "tests_knn_contract.rs"]
mod tests_knn_contract;

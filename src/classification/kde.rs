//! Kernel density (generative) classifier.

use super::{argmax_lowest, n_classes};
use crate::error::{ReidentError, Result};
use crate::primitives::{squared_euclidean, Matrix};
use crate::traits::Classifier;

/// Bayesian classifier over per-class Gaussian kernel density estimates.
///
/// For each class c the model keeps the class's training rows and scores a
/// sample by
///
/// ```text
/// log P(c) + log p(x | c) = logsumexp_{j ∈ c}( -||x - x_j||² / (2h²) ) - log n + const
/// ```
///
/// The prior `n_c / n` cancels the `1 / n_c` of the density estimate, and the
/// Gaussian normalizer is shared by every class, so it is dropped.
///
/// # Example
///
/// ```
/// use reident::classification::KernelDensityClassifier;
/// use reident::prelude::*;
///
/// let x = Matrix::from_vec(4, 1, vec![0.0, 0.5, 8.0, 8.5]).unwrap();
/// let y = vec![0, 0, 1, 1];
///
/// let mut kde = KernelDensityClassifier::new(1.0);
/// kde.fit(&x, &y).unwrap();
/// let test = Matrix::from_vec(1, 1, vec![7.0]).unwrap();
/// assert_eq!(kde.predict(&test).unwrap(), vec![1]);
/// ```
#[derive(Debug, Clone)]
pub struct KernelDensityClassifier {
    bandwidth: f32,
    x_train: Option<Matrix<f32>>,
    y_train: Vec<usize>,
    n_classes: usize,
}

impl KernelDensityClassifier {
    /// Creates a classifier with the given kernel bandwidth h.
    #[must_use]
    pub fn new(bandwidth: f32) -> Self {
        Self {
            bandwidth,
            x_train: None,
            y_train: Vec::new(),
            n_classes: 0,
        }
    }

    /// Returns the kernel bandwidth.
    #[must_use]
    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }

    /// Per-class log scores for one sample.
    fn class_log_scores(&self, x_train: &Matrix<f32>, sample: &[f32]) -> Vec<f64> {
        let two_h2 = 2.0 * f64::from(self.bandwidth) * f64::from(self.bandwidth);

        let mut exponents: Vec<Vec<f64>> = vec![Vec::new(); self.n_classes];
        for (row, &label) in x_train.rows().zip(&self.y_train) {
            exponents[label].push(-squared_euclidean(row, sample) / two_h2);
        }

        exponents.iter().map(|e| log_sum_exp(e)).collect()
    }
}

impl Classifier for KernelDensityClassifier {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        if x.n_rows() == 0 {
            return Err("Cannot fit with zero samples".into());
        }
        if x.n_rows() != y.len() {
            return Err("Number of samples in X and y must match".into());
        }
        if !(self.bandwidth.is_finite() && self.bandwidth > 0.0) {
            return Err(ReidentError::invalid_hyperparameter(
                "bandwidth",
                self.bandwidth,
                "> 0",
            ));
        }

        self.n_classes = n_classes(y);
        self.x_train = Some(x.clone());
        self.y_train = y.to_vec();
        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let x_train = self.x_train.as_ref().ok_or("Model not fitted")?;

        if x.n_cols() != x_train.n_cols() {
            return Err(ReidentError::dimension_mismatch(
                "features",
                x_train.n_cols(),
                x.n_cols(),
            ));
        }

        x.rows()
            .map(|sample| {
                let scores = self.class_log_scores(x_train, sample);
                argmax_lowest(&scores).ok_or_else(|| "Model has no classes".into())
            })
            .collect()
    }
}

/// Numerically stable `ln(Σ exp(v))`; `-inf` for an empty slice.
fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_sum_exp_matches_naive() {
        let values = [-1.0, -2.0, -0.5];
        let naive = values.iter().map(|v: &f64| v.exp()).sum::<f64>().ln();
        assert!((log_sum_exp(&values) - naive).abs() < 1e-12);
    }

    #[test]
    fn test_log_sum_exp_empty() {
        assert_eq!(log_sum_exp(&[]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_log_sum_exp_far_tail_is_finite() {
        // exp(-2000) underflows; the shifted form must not
        let v = log_sum_exp(&[-2000.0, -2001.0]);
        assert!(v.is_finite());
        assert!((v + 2000.0).abs() < 1.0);
    }

    #[test]
    fn test_rejects_non_positive_bandwidth() {
        let x = Matrix::from_vec(2, 1, vec![0.0, 1.0]).expect("2x1");
        let mut kde = KernelDensityClassifier::new(0.0);
        let err = kde.fit(&x, &[0, 1]).unwrap_err();
        assert!(err.to_string().contains("bandwidth"));
    }

    #[test]
    fn test_denser_class_wins_between_clusters() {
        // Class 1 has three rows near 3.0, class 0 one row at 0.0
        let x = Matrix::from_vec(4, 1, vec![0.0, 3.0, 3.1, 2.9]).expect("4x1");
        let mut kde = KernelDensityClassifier::new(1.0);
        kde.fit(&x, &[0, 1, 1, 1]).expect("fit");
        let mid = Matrix::from_vec(1, 1, vec![1.5]).expect("1x1");
        assert_eq!(kde.predict(&mid).expect("predict"), vec![1]);
    }

    #[test]
    fn test_label_without_rows_never_wins() {
        // Label 1 never appears in training
        let x = Matrix::from_vec(2, 1, vec![0.0, 1.0]).expect("2x1");
        let mut kde = KernelDensityClassifier::new(0.5);
        kde.fit(&x, &[0, 2]).expect("fit");
        let preds = kde.predict(&x).expect("predict");
        assert_eq!(preds, vec![0, 2]);
    }
}

//! Kernel Support Vector Machine (one-vs-rest).

use super::{argmax_lowest, n_classes};
use crate::error::{ReidentError, Result};
use crate::primitives::{squared_euclidean, Matrix};
use crate::traits::Classifier;
use serde::{Deserialize, Serialize};

/// Kernel function for [`KernelSvm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SvmKernel {
    /// Dot product `x·z`
    Linear,
    /// Gaussian radial basis `exp(-γ·||x - z||²)`
    #[default]
    Rbf,
}

/// Kernel Support Vector Machine classifier.
///
/// Multi-class problems are decomposed one-vs-rest: one binary machine per
/// class, and the class with the largest decision value wins (lowest class
/// on ties).
///
/// # Algorithm
///
/// Each binary machine is trained with kernelized Pegasos, minimizing
/// ```text
/// min  (λ/2)||w||² + (1/n) Σᵢ max(0, 1 - yᵢ f(xᵢ))
/// ```
/// with λ = 1/(nC). Samples are visited in order, one pass per epoch, so
/// training is deterministic. A constant 1 is added to the kernel to absorb
/// the bias term.
///
/// # Example
///
/// ```
/// use reident::classification::{KernelSvm, SvmKernel};
/// use reident::prelude::*;
///
/// let x = Matrix::from_vec(6, 1, vec![0.0, 0.2, 0.4, 5.0, 5.2, 5.4]).unwrap();
/// let y = vec![0, 0, 0, 1, 1, 1];
///
/// let mut svm = KernelSvm::new().with_kernel(SvmKernel::Rbf).with_gamma(0.5);
/// svm.fit(&x, &y).unwrap();
/// let test = Matrix::from_vec(2, 1, vec![0.1, 5.3]).unwrap();
/// assert_eq!(svm.predict(&test).unwrap(), vec![0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct KernelSvm {
    pub(crate) kernel: SvmKernel,
    /// Regularization parameter (default: 1.0). Larger C means less regularization
    pub(crate) c: f32,
    /// RBF width (default: 0.5)
    pub(crate) gamma: f32,
    /// Passes over the training data per binary machine (default: 20)
    pub(crate) max_iter: usize,
    /// Training rows, kept as support candidates
    support: Option<Matrix<f32>>,
    /// Dual coefficients per class, one per training row
    coef: Vec<Vec<f64>>,
}

impl Default for KernelSvm {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelSvm {
    /// Creates a new kernel SVM with default parameters.
    ///
    /// # Default Parameters
    ///
    /// - kernel: RBF
    /// - C: 1.0
    /// - gamma: 0.5
    /// - `max_iter`: 20 epochs
    #[must_use]
    pub fn new() -> Self {
        Self {
            kernel: SvmKernel::Rbf,
            c: 1.0,
            gamma: 0.5,
            max_iter: 20,
            support: None,
            coef: Vec::new(),
        }
    }

    /// Sets the kernel function.
    #[must_use]
    pub fn with_kernel(mut self, kernel: SvmKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Sets the regularization parameter C.
    #[must_use]
    pub fn with_c(mut self, c: f32) -> Self {
        self.c = c;
        self
    }

    /// Sets the RBF kernel coefficient.
    #[must_use]
    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the number of training epochs.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    fn kernel_value(&self, a: &[f32], b: &[f32]) -> f64 {
        let k = match self.kernel {
            SvmKernel::Linear => a.iter().zip(b).map(|(x, y)| f64::from(x * y)).sum(),
            SvmKernel::Rbf => (-f64::from(self.gamma) * squared_euclidean(a, b)).exp(),
        };
        k + 1.0
    }

    fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(ReidentError::invalid_hyperparameter("C", self.c, "> 0"));
        }
        if self.kernel == SvmKernel::Rbf && !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(ReidentError::invalid_hyperparameter("gamma", self.gamma, "> 0"));
        }
        if self.max_iter == 0 {
            return Err(ReidentError::invalid_hyperparameter("max_iter", 0, ">= 1"));
        }
        Ok(())
    }

    /// Trains one binary machine (`class` vs rest) on a precomputed Gram matrix.
    fn fit_binary(&self, gram: &[f64], y: &[usize], class: usize) -> Vec<f64> {
        let n = y.len();
        let lambda = 1.0 / (n as f64 * f64::from(self.c));
        let signed: Vec<f64> = y
            .iter()
            .map(|&label| if label == class { 1.0 } else { -1.0 })
            .collect();

        // g[k] = Σ_j α_j y_j K(x_j, x_k), updated incrementally
        let mut alpha = vec![0.0_f64; n];
        let mut g = vec![0.0_f64; n];
        let mut t = 0.0_f64;

        for _ in 0..self.max_iter {
            for i in 0..n {
                t += 1.0;
                let decision = g[i] / (lambda * t);
                if signed[i] * decision < 1.0 {
                    alpha[i] += 1.0;
                    let row = &gram[i * n..(i + 1) * n];
                    for (g_k, &k_ik) in g.iter_mut().zip(row) {
                        *g_k += signed[i] * k_ik;
                    }
                }
            }
        }

        let scale = lambda * t;
        alpha
            .iter()
            .zip(&signed)
            .map(|(a, s)| a * s / scale)
            .collect()
    }
}

impl Classifier for KernelSvm {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        if x.n_rows() != y.len() {
            return Err("x and y must have the same number of samples".into());
        }

        if x.n_rows() == 0 {
            return Err("Cannot fit with 0 samples".into());
        }

        self.validate()?;

        let n = x.n_rows();
        let mut gram = vec![0.0_f64; n * n];
        for i in 0..n {
            for j in i..n {
                let k = self.kernel_value(x.row(i), x.row(j));
                gram[i * n + j] = k;
                gram[j * n + i] = k;
            }
        }

        self.coef = (0..n_classes(y))
            .map(|class| self.fit_binary(&gram, y, class))
            .collect();
        self.support = Some(x.clone());

        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let support = self.support.as_ref().ok_or("Model not trained yet")?;

        if x.n_cols() != support.n_cols() {
            return Err(ReidentError::dimension_mismatch(
                "features",
                support.n_cols(),
                x.n_cols(),
            ));
        }

        let mut predictions = Vec::with_capacity(x.n_rows());
        for sample in x.rows() {
            let kernels: Vec<f64> = support
                .rows()
                .map(|sv| self.kernel_value(sv, sample))
                .collect();
            let scores: Vec<f64> = self
                .coef
                .iter()
                .map(|coef| coef.iter().zip(&kernels).map(|(c, k)| c * k).sum())
                .collect();
            predictions.push(argmax_lowest(&scores).ok_or("Model has no classes")?);
        }

        Ok(predictions)
    }
}

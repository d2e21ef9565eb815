//! Per-trial feature normalization.
//!
//! Every trial rescales the candidate pool's feature blocks and the held-out
//! query with one statistic computed over the pooled batch rows. Query rows
//! never contribute to the statistic.
//!
//! # Example
//!
//! ```
//! use reident::prelude::*;
//! use reident::preprocessing::NormalizationPolicy;
//!
//! let alice = Matrix::from_vec(2, 2, vec![1.0, 100.0, 3.0, 300.0]).expect("2x2");
//! let bob = Matrix::from_vec(2, 2, vec![2.0, 200.0, 4.0, 400.0]).expect("2x2");
//! let query = Matrix::from_vec(1, 2, vec![2.5, 250.0]).expect("1x2");
//!
//! let normalized = NormalizationPolicy::default()
//!     .normalize(&[&alice, &bob], &query)
//!     .expect("non-degenerate batch");
//!
//! assert_eq!(normalized.blocks.len(), 2);
//! assert_eq!(normalized.query.shape(), (1, 2));
//! // Second feature is ~100x the first before scaling, ~1x after
//! let ratio = normalized.query.get(0, 1) / normalized.query.get(0, 0);
//! assert!(ratio < 2.0);
//! ```

use crate::error::{ReidentError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// How the trial batch and query are rescaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum NormalizationPolicy {
    /// Divide by the pooled standard deviation plus `eps`.
    ///
    /// With more than one feature and more than one row in every block, the
    /// scale is the per-feature sample standard deviation (ddof = 1).
    /// Otherwise it is the population standard deviation of all pooled
    /// values flattened (ddof = 0), broadcast to every feature.
    Standardize {
        /// Added to every scale entry (default 0.1)
        #[serde(default = "default_eps")]
        eps: f32,
    },
    /// Map each feature to `(x - min) / (max - min)` using pooled extremes.
    MinMaxBound,
}

fn default_eps() -> f32 {
    NormalizationPolicy::DEFAULT_EPS
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        Self::Standardize {
            eps: Self::DEFAULT_EPS,
        }
    }
}

/// Normalized copies of a trial's batch blocks and query.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// One rescaled block per input block, same order and shapes
    pub blocks: Vec<Matrix<f32>>,
    /// Rescaled query rows
    pub query: Matrix<f32>,
}

impl NormalizationPolicy {
    /// Default stabilizer for [`NormalizationPolicy::Standardize`].
    pub const DEFAULT_EPS: f32 = 0.1;

    /// Standardization with the given stabilizer.
    #[must_use]
    pub fn standardize(eps: f32) -> Self {
        Self::Standardize { eps }
    }

    /// Checks the policy's own parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ReidentError::InvalidHyperparameter`] if `eps` is not
    /// strictly positive and finite.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Standardize { eps } if !(eps.is_finite() && eps > 0.0) => Err(
                ReidentError::invalid_hyperparameter("eps", eps, "finite and > 0"),
            ),
            _ => Ok(()),
        }
    }

    /// Computes the scale statistic over the pooled batch rows.
    ///
    /// # Errors
    ///
    /// - [`ReidentError::DimensionMismatch`] if blocks disagree on width
    /// - [`ReidentError::DegenerateNormalization`] if the batch holds no rows
    ///   or any divisor is not strictly positive and finite
    pub fn fit(&self, blocks: &[&Matrix<f32>]) -> Result<FeatureScale> {
        self.validate()?;

        let n_features = pooled_width(blocks)?;
        let n_rows: usize = blocks.iter().map(|b| b.n_rows()).sum();
        if n_rows == 0 {
            return Err(ReidentError::degenerate("pooled batch has no rows"));
        }

        match *self {
            Self::Standardize { eps } => {
                let per_feature = n_features > 1 && blocks.iter().all(|b| b.n_rows() > 1);
                let std = if per_feature {
                    per_feature_sample_std(blocks, n_features, n_rows)
                } else {
                    vec![flattened_std(blocks, n_features * n_rows); n_features]
                };
                let divisor = std.into_iter().map(|s| (s + f64::from(eps)) as f32).collect();
                FeatureScale::new(vec![0.0; n_features], divisor)
            }
            Self::MinMaxBound => {
                let mut min = vec![f32::INFINITY; n_features];
                let mut max = vec![f32::NEG_INFINITY; n_features];
                for row in blocks.iter().flat_map(|b| b.rows()) {
                    for (j, &v) in row.iter().enumerate() {
                        min[j] = min[j].min(v);
                        max[j] = max[j].max(v);
                    }
                }
                let divisor = min.iter().zip(&max).map(|(lo, hi)| hi - lo).collect();
                FeatureScale::new(min, divisor)
            }
        }
    }

    /// Fits on `blocks` and rescales both the blocks and `query`.
    ///
    /// # Errors
    ///
    /// Everything [`NormalizationPolicy::fit`] reports, plus
    /// [`ReidentError::DimensionMismatch`] if the query width differs.
    pub fn normalize(&self, blocks: &[&Matrix<f32>], query: &Matrix<f32>) -> Result<Normalized> {
        let scale = self.fit(blocks)?;
        Ok(Normalized {
            blocks: blocks
                .iter()
                .map(|b| scale.apply(b))
                .collect::<Result<_>>()?,
            query: scale.apply(query)?,
        })
    }
}

/// A fitted affine rescaling: `(x - offset[j]) / divisor[j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScale {
    offset: Vec<f32>,
    divisor: Vec<f32>,
}

impl FeatureScale {
    /// Builds a scale from per-feature offset and divisor.
    ///
    /// # Errors
    ///
    /// Returns [`ReidentError::DegenerateNormalization`] if any divisor is not
    /// strictly positive and finite, [`ReidentError::DimensionMismatch`] if
    /// the vectors differ in length.
    pub fn new(offset: Vec<f32>, divisor: Vec<f32>) -> Result<Self> {
        if offset.len() != divisor.len() {
            return Err(ReidentError::dimension_mismatch(
                "scale offset/divisor",
                offset.len(),
                divisor.len(),
            ));
        }
        if let Some((j, d)) = divisor
            .iter()
            .enumerate()
            .find(|(_, d)| !(d.is_finite() && **d > 0.0))
        {
            return Err(ReidentError::degenerate(format!(
                "scale for feature {j} is {d}, must be finite and > 0"
            )));
        }
        Ok(Self { offset, divisor })
    }

    /// Per-feature offset subtracted before dividing.
    #[must_use]
    pub fn offset(&self) -> &[f32] {
        &self.offset
    }

    /// Per-feature divisor.
    #[must_use]
    pub fn divisor(&self) -> &[f32] {
        &self.divisor
    }

    /// Number of features this scale applies to.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.divisor.len()
    }

    /// Applies the scale to every row of `x`.
    ///
    /// # Errors
    ///
    /// Returns [`ReidentError::DimensionMismatch`] if `x` has a different
    /// number of columns.
    pub fn apply(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        if x.n_cols() != self.n_features() {
            return Err(ReidentError::dimension_mismatch(
                "features",
                self.n_features(),
                x.n_cols(),
            ));
        }
        Ok(x.map_columns(|v, j| (v - self.offset[j]) / self.divisor[j]))
    }
}

/// Common column count of the blocks.
fn pooled_width(blocks: &[&Matrix<f32>]) -> Result<usize> {
    let Some(first) = blocks.first() else {
        return Err(ReidentError::degenerate("no blocks to normalize"));
    };
    let width = first.n_cols();
    if let Some(bad) = blocks.iter().find(|b| b.n_cols() != width) {
        return Err(ReidentError::dimension_mismatch("block features", width, bad.n_cols()));
    }
    Ok(width)
}

/// Square root of the pooled covariance diagonal (ddof = 1).
fn per_feature_sample_std(blocks: &[&Matrix<f32>], n_features: usize, n_rows: usize) -> Vec<f64> {
    let mut sum = vec![0.0_f64; n_features];
    for row in blocks.iter().flat_map(|b| b.rows()) {
        for (s, &v) in sum.iter_mut().zip(row) {
            *s += f64::from(v);
        }
    }
    let mean: Vec<f64> = sum.iter().map(|s| s / n_rows as f64).collect();

    let mut sq = vec![0.0_f64; n_features];
    for row in blocks.iter().flat_map(|b| b.rows()) {
        for ((acc, &v), m) in sq.iter_mut().zip(row).zip(&mean) {
            let d = f64::from(v) - m;
            *acc += d * d;
        }
    }
    sq.into_iter()
        .map(|s| (s / (n_rows - 1) as f64).sqrt())
        .collect()
}

/// Population standard deviation of every pooled value (ddof = 0).
fn flattened_std(blocks: &[&Matrix<f32>], n_values: usize) -> f64 {
    if n_values == 0 {
        return f64::NAN;
    }
    let values = || blocks.iter().flat_map(|b| b.as_slice().iter().map(|&v| f64::from(v)));
    let mean = values().sum::<f64>() / n_values as f64;
    let var = values().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n_values as f64;
    var.sqrt()
}


#[cfg(test)]
#[path = "tests_normalization_contract.rs"]
mod tests_normalization_contract;

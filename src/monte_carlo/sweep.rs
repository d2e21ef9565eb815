//! Parameter sweeps over pool size and split fraction.

use super::{AccuracyEstimator, MonteCarloRng};
use crate::dataset::{Partitioner, Population};
use crate::error::{ReidentError, Result};
use crate::traits::ClassifierFactory;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Slack on the upper bound of a fraction range, matching `arange(min, max + 0.001, step)`.
const RANGE_TOLERANCE: f64 = 0.001;

/// Upper bound on `(max - min) / step` for a split range.
pub const MAX_SWEEP_POINTS: u32 = 10_000;

/// Inclusive range of split fractions `min, min + step, ...` up to `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRange {
    min: f64,
    max: f64,
    step: f64,
}

impl SplitRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns [`ReidentError::EmptySweepRange`] if `step` is not positive
    /// and finite, either bound is not finite, `max < min`, or the range
    /// would hold more than [`MAX_SWEEP_POINTS`] steps.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(ReidentError::empty_sweep(format!(
                "step must be finite and > 0, got {step}"
            )));
        }
        if !(min.is_finite() && max.is_finite()) {
            return Err(ReidentError::empty_sweep(format!(
                "bounds must be finite, got [{min}, {max}]"
            )));
        }
        if max < min {
            return Err(ReidentError::empty_sweep(format!(
                "max {max} is below min {min}"
            )));
        }
        let steps = (max - min) / step;
        if steps > f64::from(MAX_SWEEP_POINTS) {
            return Err(ReidentError::empty_sweep(format!(
                "step {step} gives {steps:.0} points, at most {MAX_SWEEP_POINTS} allowed"
            )));
        }
        Ok(Self { min, max, step })
    }

    /// Lower bound.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Step between points.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Sweep points `min + i·step` for every `i` with the point at most
    /// `max + 0.001`.
    ///
    /// # Example
    ///
    /// ```
    /// use reident::monte_carlo::SplitRange;
    ///
    /// let range = SplitRange::new(0.1, 0.9, 0.1).unwrap();
    /// assert_eq!(range.points().len(), 9);
    /// ```
    #[must_use]
    pub fn points(&self) -> Vec<f64> {
        (0..=MAX_SWEEP_POINTS + 1)
            .map(|i| self.min + f64::from(i) * self.step)
            .take_while(|p| *p <= self.max + RANGE_TOLERANCE)
            .collect()
    }
}

/// One classifier's accuracy as a function of the sweep parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyCurve {
    /// Classifier configuration name
    pub label: String,
    /// `(parameter, success probability)` pairs in sweep order
    pub points: Vec<(f64, f64)>,
}

impl AccuracyCurve {
    /// Success probabilities in sweep order.
    pub fn accuracies(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, a)| *a)
    }
}

/// Sweep result: rows are classifier configurations, columns sweep points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMatrix {
    parameter: String,
    parameters: Vec<f64>,
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl AccuracyMatrix {
    fn zeros(parameter: &str, parameters: Vec<f64>, labels: Vec<String>) -> Self {
        let values = vec![vec![0.0; parameters.len()]; labels.len()];
        Self {
            parameter: parameter.to_string(),
            parameters,
            labels,
            values,
        }
    }

    /// Name of the swept parameter (`"N"`, `"p"`, or `"q"`).
    #[must_use]
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Sweep parameter values, one per column.
    #[must_use]
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// Classifier names, one per row.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Accuracy grid, `values()[classifier][point]`.
    #[must_use]
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// `(classifiers, points)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.labels.len(), self.parameters.len())
    }

    /// Accuracy of classifier `row` at sweep point `col`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    /// Curve of one classifier, `None` if `row` is out of bounds.
    #[must_use]
    pub fn curve(&self, row: usize) -> Option<AccuracyCurve> {
        let values = self.values.get(row)?;
        Some(AccuracyCurve {
            label: self.labels[row].clone(),
            points: self.parameters.iter().copied().zip(values.iter().copied()).collect(),
        })
    }

    /// Every classifier's curve, in row order.
    #[must_use]
    pub fn curves(&self) -> Vec<AccuracyCurve> {
        (0..self.labels.len()).filter_map(|row| self.curve(row)).collect()
    }
}

/// Drives the estimator across sweep points and classifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepController {
    estimator: AccuracyEstimator,
}

impl SweepController {
    /// Controller using `estimator` for every point.
    #[must_use]
    pub fn new(estimator: AccuracyEstimator) -> Self {
        Self { estimator }
    }

    /// The estimator run at every point.
    #[must_use]
    pub fn estimator(&self) -> &AccuracyEstimator {
        &self.estimator
    }

    /// Accuracy for every classifier (outer loop) and every pool size
    /// `1..=n_max` (inner loop).
    ///
    /// # Errors
    ///
    /// [`ReidentError::EmptySweepRange`] if `n_max == 0` or `classifiers`
    /// is empty; otherwise the first estimator error. No partial matrix is
    /// returned.
    pub fn sweep_pool_size<F>(
        &self,
        population: &Population,
        n_max: usize,
        classifiers: &[F],
        rng: &mut MonteCarloRng,
    ) -> Result<AccuracyMatrix>
    where
        F: ClassifierFactory,
    {
        if n_max == 0 {
            return Err(ReidentError::empty_sweep("N_max is 0"));
        }
        if classifiers.is_empty() {
            return Err(ReidentError::empty_sweep("no classifier configurations"));
        }

        let parameters: Vec<f64> = (1..=n_max).map(|n| n as f64).collect();
        let labels = classifiers.iter().map(|c| c.name()).collect();
        let mut matrix = AccuracyMatrix::zeros("N", parameters, labels);

        for (row, factory) in classifiers.iter().enumerate() {
            for n in 1..=n_max {
                let estimate = self.estimator.estimate(population, n, factory, rng)?;
                info!(
                    classifier = %matrix.labels[row],
                    n,
                    accuracy = estimate.accuracy,
                    "pool size point done"
                );
                matrix.values[row][n - 1] = estimate.accuracy;
            }
        }

        Ok(matrix)
    }

    /// Accuracy at a fixed pool size `n` for every split fraction in
    /// `range` (outer loop) and every classifier (inner loop). The
    /// partitioner builds a fresh population at each fraction.
    ///
    /// `parameter` names the swept fraction in the result (`"p"` or `"q"`).
    ///
    /// # Errors
    ///
    /// [`ReidentError::EmptySweepRange`] if `classifiers` is empty or the
    /// range yields no points; otherwise the first partition or estimator
    /// error. No partial matrix is returned.
    pub fn sweep_split_fraction<P, F>(
        &self,
        partitioner: &P,
        range: &SplitRange,
        parameter: &str,
        n: usize,
        classifiers: &[F],
        rng: &mut MonteCarloRng,
    ) -> Result<AccuracyMatrix>
    where
        P: Partitioner + ?Sized,
        F: ClassifierFactory,
    {
        if classifiers.is_empty() {
            return Err(ReidentError::empty_sweep("no classifier configurations"));
        }
        let points = range.points();
        if points.is_empty() {
            return Err(ReidentError::empty_sweep("split range has no points"));
        }

        let labels = classifiers.iter().map(|c| c.name()).collect();
        let mut matrix = AccuracyMatrix::zeros(parameter, points.clone(), labels);

        for (col, &fraction) in points.iter().enumerate() {
            info!(parameter, fraction, "testing split fraction");
            let population = partitioner.partition(fraction)?;
            for (row, factory) in classifiers.iter().enumerate() {
                let estimate = self.estimator.estimate(&population, n, factory, rng)?;
                info!(
                    classifier = %matrix.labels[row],
                    parameter,
                    fraction,
                    accuracy = estimate.accuracy,
                    "split point done"
                );
                matrix.values[row][col] = estimate.accuracy;
            }
        }

        Ok(matrix)
    }
}

#[cfg(test)]
#[path = "sweep_tests.rs"]
mod tests;

//! Accuracy estimation: many independent trials for one pool size.

use super::{MonteCarloRng, TrialRunner};
use crate::dataset::Population;
use crate::error::{ReidentError, Result};
use crate::preprocessing::NormalizationPolicy;
use crate::traits::ClassifierFactory;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What to do when a trial fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the estimate with the first trial error
    #[default]
    Propagate,
    /// Count a failed trial as an unsuccessful identification
    CountAsMiss,
}

/// Empirical success probability for one pool size and classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyEstimate {
    /// Pool size N
    pub n_candidates: usize,
    /// Trials run
    pub n_iters: usize,
    /// Trials whose majority vote recovered the target
    pub n_correct: usize,
    /// Trials that failed and were counted as misses
    pub n_failed: usize,
    /// `n_correct / n_iters`
    pub accuracy: f64,
}

impl AccuracyEstimate {
    fn new(n_candidates: usize, n_iters: usize, n_correct: usize, n_failed: usize) -> Self {
        Self {
            n_candidates,
            n_iters,
            n_correct,
            n_failed,
            accuracy: n_correct as f64 / n_iters as f64,
        }
    }

    /// Binomial standard error `sqrt(p(1-p)/n_iters)`.
    #[must_use]
    pub fn std_error(&self) -> f64 {
        (self.accuracy * (1.0 - self.accuracy) / self.n_iters as f64).sqrt()
    }

    /// Success probability of guessing uniformly among N candidates.
    #[must_use]
    pub fn chance_level(&self) -> f64 {
        1.0 / self.n_candidates as f64
    }
}

/// Repeats trials and averages their outcomes.
///
/// # Example
///
/// ```
/// use reident::classification::KNearestNeighbors;
/// use reident::dataset::SyntheticPopulation;
/// use reident::monte_carlo::{AccuracyEstimator, MonteCarloRng};
/// use reident::prelude::*;
///
/// struct OneNn;
/// impl ClassifierFactory for OneNn {
///     fn name(&self) -> String { "kNN".into() }
///     fn build(&self) -> reident::Result<Box<dyn Classifier>> {
///         Ok(Box::new(KNearestNeighbors::new(1)))
///     }
/// }
///
/// let mut rng = MonteCarloRng::new(0);
/// let population = SyntheticPopulation::new(8, 10).population(&mut rng).unwrap();
///
/// let estimate = AccuracyEstimator::new()
///     .with_n_iters(50)
///     .estimate(&population, 4, &OneNn, &mut rng)
///     .unwrap();
/// assert!((0.0..=1.0).contains(&estimate.accuracy));
/// assert_eq!(estimate.n_iters, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyEstimator {
    n_iters: usize,
    runner: TrialRunner,
    failure_policy: FailurePolicy,
}

impl Default for AccuracyEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl AccuracyEstimator {
    /// Default number of trials per estimate.
    pub const DEFAULT_N_ITERS: usize = 1000;

    /// 1000 trials, standardize normalization, propagate failures.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_iters: Self::DEFAULT_N_ITERS,
            runner: TrialRunner::new(),
            failure_policy: FailurePolicy::Propagate,
        }
    }

    /// Sets the number of trials.
    #[must_use]
    pub fn with_n_iters(mut self, n_iters: usize) -> Self {
        self.n_iters = n_iters;
        self
    }

    /// Sets the per-trial normalization policy.
    #[must_use]
    pub fn with_normalization(mut self, normalization: NormalizationPolicy) -> Self {
        self.runner = self.runner.with_normalization(normalization);
        self
    }

    /// Sets the trial failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Number of trials per estimate.
    #[must_use]
    pub fn n_iters(&self) -> usize {
        self.n_iters
    }

    /// Normalization policy handed to every trial.
    #[must_use]
    pub fn normalization(&self) -> NormalizationPolicy {
        self.runner.normalization()
    }

    /// Trial failure policy.
    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Estimates the probability of re-identifying a user among `n`
    /// candidates.
    ///
    /// A pool of one is always identified: `n == 1` returns 1.0 without
    /// drawing random numbers or building a classifier.
    ///
    /// # Errors
    ///
    /// - [`ReidentError::InvalidHyperparameter`] if `n == 0` or
    ///   `n_iters == 0`, or the normalization policy is invalid
    /// - [`ReidentError::InsufficientPopulation`] if `n` exceeds the
    ///   population
    /// - the first trial error under [`FailurePolicy::Propagate`]
    pub fn estimate<F>(
        &self,
        population: &Population,
        n: usize,
        factory: &F,
        rng: &mut MonteCarloRng,
    ) -> Result<AccuracyEstimate>
    where
        F: ClassifierFactory + ?Sized,
    {
        if n == 0 {
            return Err(ReidentError::invalid_hyperparameter("N", 0, ">= 1"));
        }
        if self.n_iters == 0 {
            return Err(ReidentError::invalid_hyperparameter("n_iters", 0, ">= 1"));
        }
        if n > population.len() {
            return Err(ReidentError::InsufficientPopulation {
                requested: n,
                available: population.len(),
            });
        }
        self.runner.normalization().validate()?;

        if n == 1 {
            debug!(classifier = %factory.name(), n, "single candidate, accuracy 1");
            return Ok(AccuracyEstimate::new(n, self.n_iters, self.n_iters, 0));
        }

        let mut n_correct = 0;
        let mut n_failed = 0;
        for iter in 0..self.n_iters {
            match self.runner.run(population, n, factory, rng) {
                Ok(outcome) => n_correct += usize::from(outcome.success()),
                Err(err) => match self.failure_policy {
                    FailurePolicy::Propagate => return Err(err),
                    FailurePolicy::CountAsMiss => {
                        warn!(iter, error = %err, "trial failed, counted as miss");
                        n_failed += 1;
                    }
                },
            }
        }

        let estimate = AccuracyEstimate::new(n, self.n_iters, n_correct, n_failed);
        debug!(
            classifier = %factory.name(),
            n,
            accuracy = estimate.accuracy,
            std_error = estimate.std_error(),
            n_failed,
            "estimate finished"
        );
        Ok(estimate)
    }
}

#[cfg(test)]
#[path = "estimator_tests.rs"]
mod tests;

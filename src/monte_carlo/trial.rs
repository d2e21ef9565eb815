//! One re-identification trial.
//!
//! A trial draws a candidate pool and a target, normalizes the pool's blocks
//! together with the target's query rows, trains a fresh classifier on the
//! stacked blocks (labels are pool positions), and checks whether the
//! majority vote over the query's predicted labels recovers the target.
//!
//! Draw order is fixed: pool indices first, then the target position.

use super::MonteCarloRng;
use crate::dataset::Population;
use crate::error::{ReidentError, Result};
use crate::preprocessing::NormalizationPolicy;
use crate::primitives::Matrix;
use crate::traits::ClassifierFactory;
use tracing::trace;

/// Most frequent label; ties go to the lowest label. `None` when empty.
///
/// # Example
///
/// ```
/// use reident::monte_carlo::majority_vote;
///
/// assert_eq!(majority_vote(&[2, 1, 2, 1]), Some(1));
/// assert_eq!(majority_vote(&[3, 3, 0]), Some(3));
/// assert_eq!(majority_vote(&[]), None);
/// ```
#[must_use]
pub fn majority_vote(labels: &[usize]) -> Option<usize> {
    let max_label = *labels.iter().max()?;
    let mut counts = vec![0_usize; max_label + 1];
    for &label in labels {
        counts[label] += 1;
    }

    let mut best = 0;
    for (label, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = label;
        }
    }
    Some(best)
}

/// N distinct users for one trial, plus the target's position in the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    members: Vec<usize>,
    target: usize,
}

impl CandidatePool {
    /// Draws `n` distinct users uniformly from `population_len` users, then
    /// a target position uniformly from `0..n`.
    ///
    /// # Errors
    ///
    /// - [`ReidentError::InvalidHyperparameter`] if `n == 0`
    /// - [`ReidentError::InsufficientPopulation`] if `n > population_len`
    pub fn draw(population_len: usize, n: usize, rng: &mut MonteCarloRng) -> Result<Self> {
        if n == 0 {
            return Err(ReidentError::invalid_hyperparameter("N", 0, ">= 1"));
        }
        let members = rng.sample_without_replacement(population_len, n)?;
        let target = rng.index(n);
        Ok(Self { members, target })
    }

    /// Builds an explicit pool.
    ///
    /// # Errors
    ///
    /// Returns an error if `members` is empty or repeats a user, or if
    /// `target` is not a valid position.
    pub fn new(members: Vec<usize>, target: usize) -> Result<Self> {
        if members.is_empty() {
            return Err(ReidentError::invalid_hyperparameter("N", 0, ">= 1"));
        }
        if target >= members.len() {
            return Err(ReidentError::invalid_hyperparameter(
                "target",
                target,
                "< pool size",
            ));
        }
        let mut sorted = members.clone();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err("candidate pool repeats a user".into());
        }
        Ok(Self { members, target })
    }

    /// Population indices of the pool, in pool order.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Pool position j_c of the target.
    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Population index of the target user.
    #[must_use]
    pub fn target_user(&self) -> usize {
        self.members[self.target]
    }

    /// Pool size N.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a constructed pool.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Stacked training rows with pool-position labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingMatrix {
    x: Matrix<f32>,
    labels: Vec<usize>,
}

impl TrainingMatrix {
    /// Stacks `blocks` vertically; every row of block `i` gets label `i`.
    ///
    /// # Errors
    ///
    /// Returns an error if `blocks` is empty or widths differ.
    pub fn stack(blocks: &[Matrix<f32>]) -> Result<Self> {
        let refs: Vec<&Matrix<f32>> = blocks.iter().collect();
        let x = Matrix::vstack(&refs)?;
        let labels = blocks
            .iter()
            .enumerate()
            .flat_map(|(label, block)| std::iter::repeat(label).take(block.n_rows()))
            .collect();
        Ok(Self { x, labels })
    }

    /// Stacked feature rows.
    #[must_use]
    pub fn x(&self) -> &Matrix<f32> {
        &self.x
    }

    /// One label per row.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Total number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }
}

/// Result of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOutcome {
    /// Majority-vote label over the query predictions
    pub predicted: usize,
    /// True pool position j_c
    pub target: usize,
}

impl TrialOutcome {
    /// Whether the target was re-identified.
    #[must_use]
    pub fn success(&self) -> bool {
        self.predicted == self.target
    }
}

/// Runs single trials with a fixed normalization policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrialRunner {
    normalization: NormalizationPolicy,
}

impl TrialRunner {
    /// Runner with the default standardize policy (ε = 0.1).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the normalization policy.
    #[must_use]
    pub fn with_normalization(mut self, normalization: NormalizationPolicy) -> Self {
        self.normalization = normalization;
        self
    }

    /// The normalization policy in use.
    #[must_use]
    pub fn normalization(&self) -> NormalizationPolicy {
        self.normalization
    }

    /// Draws a pool of size `n` and runs one trial on it.
    ///
    /// # Errors
    ///
    /// Pool-drawing errors, [`ReidentError::DegenerateNormalization`], and
    /// [`ReidentError::ClassifierFailure`] for anything the classifier does
    /// wrong.
    pub fn run<F>(
        &self,
        population: &Population,
        n: usize,
        factory: &F,
        rng: &mut MonteCarloRng,
    ) -> Result<TrialOutcome>
    where
        F: ClassifierFactory + ?Sized,
    {
        let pool = CandidatePool::draw(population.len(), n, rng)?;
        self.run_with_pool(population, &pool, factory)
    }

    /// Runs one trial on an explicit pool. Draws no random numbers.
    ///
    /// # Errors
    ///
    /// Same as [`TrialRunner::run`], plus an error if a pool member is not a
    /// user of `population`.
    pub fn run_with_pool<F>(
        &self,
        population: &Population,
        pool: &CandidatePool,
        factory: &F,
    ) -> Result<TrialOutcome>
    where
        F: ClassifierFactory + ?Sized,
    {
        if let Some(&bad) = pool.members().iter().find(|&&m| m >= population.len()) {
            return Err(format!(
                "pool member {bad} is outside a population of {}",
                population.len()
            )
            .into());
        }

        let blocks: Vec<&Matrix<f32>> =
            pool.members().iter().map(|&m| population.block(m)).collect();
        let query = population.query(pool.target_user());

        let normalized = self.normalization.normalize(&blocks, query)?;
        let training = TrainingMatrix::stack(&normalized.blocks)?;

        let name = factory.name();
        let fail = |e: ReidentError| ReidentError::classifier(&name, e);

        let mut classifier = factory.build().map_err(fail)?;
        classifier
            .fit(training.x(), training.labels())
            .map_err(fail)?;
        let predictions = classifier.predict(&normalized.query).map_err(fail)?;

        if predictions.len() != normalized.query.n_rows() {
            return Err(ReidentError::classifier(
                &name,
                format!(
                    "{} predictions for {} query rows",
                    predictions.len(),
                    normalized.query.n_rows()
                ),
            ));
        }
        if let Some(&bad) = predictions.iter().find(|&&p| p >= pool.len()) {
            return Err(ReidentError::classifier(
                &name,
                format!("predicted label {bad} outside 0..{}", pool.len()),
            ));
        }
        let predicted = majority_vote(&predictions)
            .ok_or_else(|| ReidentError::classifier(&name, "empty prediction"))?;

        let outcome = TrialOutcome {
            predicted,
            target: pool.target(),
        };
        trace!(
            classifier = %name,
            n = pool.len(),
            target = outcome.target,
            predicted = outcome.predicted,
            "trial finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "trial_tests.rs"]
mod tests;

//! Monte Carlo re-identification engine.
//!
//! An adversary holds samples from `N` candidate users plus an unlabeled
//! query from one of them. Each trial draws a pool, trains a classifier on
//! the pool's samples, and checks whether a majority vote over the query
//! recovers the target. Averaging many trials estimates the success
//! probability; sweeping the pool size or the split fraction gives accuracy
//! curves.
//!
//! # Example
//!
//! ```
//! use reident::config::ClassifierConfig;
//! use reident::dataset::SyntheticPopulation;
//! use reident::monte_carlo::{AccuracyEstimator, MonteCarloRng, SweepController};
//!
//! let mut rng = MonteCarloRng::new(42);
//! let population = SyntheticPopulation::new(6, 10)
//!     .with_separation(4.0)
//!     .population(&mut rng)
//!     .unwrap();
//!
//! let controller = SweepController::new(AccuracyEstimator::new().with_n_iters(20));
//! let matrix = controller
//!     .sweep_pool_size(&population, 4, &[ClassifierConfig::knn(1)], &mut rng)
//!     .unwrap();
//!
//! assert_eq!(matrix.shape(), (1, 4));
//! assert_eq!(matrix.get(0, 0), 1.0);
//! ```

mod estimator;
mod rng;
mod sweep;
mod trial;

#[cfg(test)]
mod test_support;

pub use estimator::{AccuracyEstimate, AccuracyEstimator, FailurePolicy};
pub use rng::MonteCarloRng;
pub use sweep::{AccuracyCurve, AccuracyMatrix, SplitRange, SweepController, MAX_SWEEP_POINTS};
pub use trial::{majority_vote, CandidatePool, TrainingMatrix, TrialOutcome, TrialRunner};

//! Reident: Monte Carlo estimation of re-identification risk.
//!
//! Given per-user samples of some observable (keystroke timings, sensor
//! readings, mobility traces), how likely is an adversary to single out one
//! user among `N` candidates? Reident answers empirically: it draws random
//! candidate pools, trains a classifier on the pool, labels an unseen query
//! from one of the users, and counts how often a majority vote over the
//! query recovers the right user.
//!
//! # Quick Start
//!
//! ```
//! use reident::config::ClassifierConfig;
//! use reident::dataset::SyntheticPopulation;
//! use reident::monte_carlo::{AccuracyEstimator, MonteCarloRng};
//!
//! let mut rng = MonteCarloRng::new(7);
//! let population = SyntheticPopulation::new(5, 10)
//!     .with_separation(10.0)
//!     .population(&mut rng)
//!     .unwrap();
//!
//! let estimate = AccuracyEstimator::new()
//!     .with_n_iters(100)
//!     .estimate(&population, 3, &ClassifierConfig::knn(1), &mut rng)
//!     .unwrap();
//!
//! assert!(estimate.accuracy > estimate.chance_level());
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Row-major `Matrix`
//! - [`dataset`]: Populations, raw user records, holdout partitioning
//! - [`preprocessing`]: Per-trial normalization policies
//! - [`classification`]: kNN, kernel SVM, kernel density classifiers
//! - [`tree`]: Decision tree and random forest classifiers
//! - [`monte_carlo`]: Trials, accuracy estimation, parameter sweeps
//! - [`config`]: Serializable simulation parameters

pub mod classification;
pub mod config;
pub mod dataset;
pub mod error;
pub mod monte_carlo;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod traits;
pub mod tree;

pub use error::{ReidentError, Result};
pub use primitives::Matrix;
pub use traits::{Classifier, ClassifierFactory};

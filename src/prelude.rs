//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use reident::prelude::*;
//! ```

pub use crate::config::{ClassifierConfig, SimParams};
pub use crate::dataset::{HoldoutPartitioner, Partitioner, Population, SplitScope, UserRecords};
pub use crate::monte_carlo::{AccuracyEstimator, AccuracyMatrix, MonteCarloRng, SweepController};
pub use crate::preprocessing::NormalizationPolicy;
pub use crate::primitives::Matrix;
pub use crate::traits::{Classifier, ClassifierFactory};

//! Simulation parameters and classifier configurations.
//!
//! Everything is `serde` (de)serializable so a run can be described by a
//! JSON file and written back out next to its results.
//!
//! ```
//! use reident::config::{ClassifierConfig, SimParams};
//!
//! let params = SimParams::from_json(r#"{
//!     "n_max": 5,
//!     "classifiers": [{ "method": "kNN", "k": 3 }]
//! }"#).unwrap();
//!
//! assert_eq!(params.n_max, 5);
//! assert_eq!(params.n_iters, 1000);
//! assert_eq!(params.classifiers, vec![ClassifierConfig::knn(3)]);
//! params.validate().unwrap();
//! ```

use crate::classification::{
    DistanceMetric, KNearestNeighbors, KernelDensityClassifier, KernelSvm, SvmKernel,
};
use crate::dataset::SplitScope;
use crate::error::{ReidentError, Result};
use crate::monte_carlo::{
    AccuracyEstimator, FailurePolicy, MonteCarloRng, SplitRange, SweepController,
};
use crate::preprocessing::NormalizationPolicy;
use crate::traits::{Classifier, ClassifierFactory};
use crate::tree::RandomForestClassifier;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One classifier family with its hyperparameters.
///
/// Serialized with a `"method"` tag: `kNN`, `RF`, `SVM`, or `KDE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum ClassifierConfig {
    /// k-nearest neighbors
    #[serde(rename = "kNN")]
    Knn {
        /// Neighbors consulted per query row
        #[serde(default = "default_k")]
        k: usize,
        /// Distance metric
        #[serde(default)]
        metric: DistanceMetric,
        /// Inverse-distance weighted vote
        #[serde(default)]
        weighted: bool,
    },
    /// Random forest of CART trees
    #[serde(rename = "RF")]
    RandomForest {
        /// Number of trees
        #[serde(default = "default_n_estimators")]
        n_estimators: usize,
        /// Depth limit per tree
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_depth: Option<usize>,
        /// Forest seed; unseeded forests draw from OS entropy
        #[serde(default = "default_random_state")]
        random_state: Option<u64>,
    },
    /// One-vs-rest kernel SVM
    #[serde(rename = "SVM")]
    Svm {
        /// Kernel function
        #[serde(default)]
        kernel: SvmKernel,
        /// Regularization parameter
        #[serde(rename = "C", default = "default_c")]
        c: f32,
        /// RBF width
        #[serde(default = "default_gamma")]
        gamma: f32,
        /// Training epochs per binary machine
        #[serde(default = "default_max_iter")]
        max_iter: usize,
    },
    /// Gaussian kernel density per class
    #[serde(rename = "KDE")]
    Kde {
        /// Kernel bandwidth h
        #[serde(default = "default_bandwidth")]
        bandwidth: f32,
    },
}

fn default_k() -> usize {
    1
}

fn default_n_estimators() -> usize {
    100
}

fn default_random_state() -> Option<u64> {
    Some(0)
}

fn default_c() -> f32 {
    100.0
}

fn default_gamma() -> f32 {
    0.5
}

fn default_max_iter() -> usize {
    20
}

fn default_bandwidth() -> f32 {
    1.0
}

impl ClassifierConfig {
    /// kNN with `k` neighbors, Euclidean distance, uniform vote.
    #[must_use]
    pub fn knn(k: usize) -> Self {
        Self::Knn {
            k,
            metric: DistanceMetric::Euclidean,
            weighted: false,
        }
    }

    /// Seeded random forest with `n_estimators` unlimited-depth trees.
    #[must_use]
    pub fn random_forest(n_estimators: usize) -> Self {
        Self::RandomForest {
            n_estimators,
            max_depth: None,
            random_state: default_random_state(),
        }
    }

    /// Kernel SVM with the default number of epochs.
    #[must_use]
    pub fn svm(kernel: SvmKernel, c: f32, gamma: f32) -> Self {
        Self::Svm {
            kernel,
            c,
            gamma,
            max_iter: default_max_iter(),
        }
    }

    /// Kernel density classifier with bandwidth `h`.
    #[must_use]
    pub fn kde(bandwidth: f32) -> Self {
        Self::Kde { bandwidth }
    }

    /// kNN(k=1), RF(100 trees), SVM(rbf, C=100, γ=0.5), KDE(h=1).
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::knn(1),
            Self::random_forest(100),
            Self::svm(SvmKernel::Rbf, 100.0, 0.5),
            Self::kde(1.0),
        ]
    }

    /// Checks hyperparameters without building anything.
    ///
    /// # Errors
    ///
    /// Returns [`ReidentError::InvalidHyperparameter`] naming the first bad
    /// value.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Knn { k, metric, .. } => {
                if k == 0 {
                    return Err(ReidentError::invalid_hyperparameter("k", k, ">= 1"));
                }
                if let DistanceMetric::Minkowski(p) = metric {
                    if !(p.is_finite() && p >= 1.0) {
                        return Err(ReidentError::invalid_hyperparameter("p", p, ">= 1"));
                    }
                }
            }
            Self::RandomForest {
                n_estimators,
                max_depth,
                ..
            } => {
                if n_estimators == 0 {
                    return Err(ReidentError::invalid_hyperparameter(
                        "n_estimators",
                        n_estimators,
                        ">= 1",
                    ));
                }
                if max_depth == Some(0) {
                    return Err(ReidentError::invalid_hyperparameter("max_depth", 0, ">= 1"));
                }
            }
            Self::Svm {
                kernel,
                c,
                gamma,
                max_iter,
            } => {
                if !(c.is_finite() && c > 0.0) {
                    return Err(ReidentError::invalid_hyperparameter("C", c, "> 0"));
                }
                if kernel == SvmKernel::Rbf && !(gamma.is_finite() && gamma > 0.0) {
                    return Err(ReidentError::invalid_hyperparameter("gamma", gamma, "> 0"));
                }
                if max_iter == 0 {
                    return Err(ReidentError::invalid_hyperparameter("max_iter", 0, ">= 1"));
                }
            }
            Self::Kde { bandwidth } => {
                if !(bandwidth.is_finite() && bandwidth > 0.0) {
                    return Err(ReidentError::invalid_hyperparameter(
                        "bandwidth",
                        bandwidth,
                        "> 0",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl ClassifierFactory for ClassifierConfig {
    fn name(&self) -> String {
        match self {
            Self::Knn { k, weighted, .. } => {
                if *weighted {
                    format!("kNN(k={k}, weighted)")
                } else {
                    format!("kNN(k={k})")
                }
            }
            Self::RandomForest { n_estimators, .. } => format!("RF(n={n_estimators})"),
            Self::Svm { kernel, c, gamma, .. } => match kernel {
                SvmKernel::Linear => format!("SVM(linear, C={c})"),
                SvmKernel::Rbf => format!("SVM(rbf, C={c}, gamma={gamma})"),
            },
            Self::Kde { bandwidth } => format!("KDE(h={bandwidth})"),
        }
    }

    fn build(&self) -> Result<Box<dyn Classifier>> {
        self.validate()?;
        let classifier: Box<dyn Classifier> = match *self {
            Self::Knn {
                k,
                metric,
                weighted,
            } => Box::new(
                KNearestNeighbors::new(k)
                    .with_metric(metric)
                    .with_weights(weighted),
            ),
            Self::RandomForest {
                n_estimators,
                max_depth,
                random_state,
            } => {
                let mut forest = RandomForestClassifier::new(n_estimators);
                if let Some(depth) = max_depth {
                    forest = forest.with_max_depth(depth);
                }
                if let Some(seed) = random_state {
                    forest = forest.with_random_state(seed);
                }
                Box::new(forest)
            }
            Self::Svm {
                kernel,
                c,
                gamma,
                max_iter,
            } => Box::new(
                KernelSvm::new()
                    .with_kernel(kernel)
                    .with_c(c)
                    .with_gamma(gamma)
                    .with_max_iter(max_iter),
            ),
            Self::Kde { bandwidth } => Box::new(KernelDensityClassifier::new(bandwidth)),
        };
        Ok(classifier)
    }
}

/// Holdout split settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitParams {
    /// Which fraction the split sweep varies
    pub scope: SplitScope,
    /// Training fraction used outside the split sweep
    pub p: f64,
    /// Fixed complementary fraction
    pub q: f64,
    /// First swept fraction
    pub p_min: f64,
    /// Last swept fraction (inclusive, with 0.001 slack)
    pub p_max: f64,
    /// Sweep step
    pub p_step: f64,
}

impl Default for SplitParams {
    fn default() -> Self {
        Self {
            scope: SplitScope::Train,
            p: 0.9,
            q: 0.1,
            p_min: 0.1,
            p_max: 0.9,
            p_step: 0.1,
        }
    }
}

impl SplitParams {
    /// The swept fraction range.
    ///
    /// # Errors
    ///
    /// Returns [`ReidentError::EmptySweepRange`] for a bad range.
    pub fn range(&self) -> Result<SplitRange> {
        SplitRange::new(self.p_min, self.p_max, self.p_step)
    }

    /// Name of the swept fraction in results.
    #[must_use]
    pub fn parameter(&self) -> &'static str {
        match self.scope {
            SplitScope::Train => "p",
            SplitScope::Test => "q",
        }
    }
}

/// Parameters of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Pool size for single estimates and the split sweep
    pub n_candidates: usize,
    /// Upper end of the pool-size sweep
    pub n_max: usize,
    /// Trials per estimate
    pub n_iters: usize,
    /// Seed of the shared generator
    pub rng_seed: u64,
    /// Per-trial normalization
    pub normalization: NormalizationPolicy,
    /// Handling of failed trials
    pub failure_policy: FailurePolicy,
    /// Holdout split settings
    pub split: SplitParams,
    /// Classifier configurations, one result row each
    pub classifiers: Vec<ClassifierConfig>,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            n_candidates: 10,
            n_max: 20,
            n_iters: AccuracyEstimator::DEFAULT_N_ITERS,
            rng_seed: 0,
            normalization: NormalizationPolicy::default(),
            failure_policy: FailurePolicy::Propagate,
            split: SplitParams::default(),
            classifiers: ClassifierConfig::defaults(),
        }
    }
}

impl SimParams {
    /// Parses parameters from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ReidentError::Serialization`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and validates parameters from a JSON file.
    ///
    /// # Errors
    ///
    /// I/O, parse, and validation errors.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let params = Self::from_json(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReidentError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every numeric constraint.
    ///
    /// # Errors
    ///
    /// [`ReidentError::InvalidHyperparameter`] for out-of-range values and
    /// [`ReidentError::EmptySweepRange`] for a bad split range.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("n_candidates", self.n_candidates),
            ("n_max", self.n_max),
            ("n_iters", self.n_iters),
        ] {
            if value == 0 {
                return Err(ReidentError::invalid_hyperparameter(name, value, ">= 1"));
            }
        }
        self.normalization.validate()?;

        for (name, value) in [
            ("split.p", self.split.p),
            ("split.q", self.split.q),
            ("split.p_min", self.split.p_min),
            ("split.p_max", self.split.p_max),
        ] {
            if !(value.is_finite() && value > 0.0 && value <= 1.0) {
                return Err(ReidentError::invalid_hyperparameter(name, value, "in (0, 1]"));
            }
        }
        if self.split.p + self.split.q > 1.0 + 1e-9 {
            return Err(ReidentError::invalid_hyperparameter(
                "split.p + split.q",
                self.split.p + self.split.q,
                "<= 1",
            ));
        }
        let range = self.split.range()?;
        if let Some(last) = range.points().last() {
            // The swept fraction is always paired with the fixed `split.q`.
            if last + self.split.q > 1.0 + 1e-9 {
                return Err(ReidentError::invalid_hyperparameter(
                    "split.p_max + split.q",
                    last + self.split.q,
                    "<= 1",
                ));
            }
        }

        if self.classifiers.is_empty() {
            return Err(ReidentError::invalid_hyperparameter(
                "classifiers",
                "[]",
                "at least one configuration",
            ));
        }
        self.classifiers.iter().try_for_each(ClassifierConfig::validate)
    }

    /// Estimator with these trial, normalization, and failure settings.
    #[must_use]
    pub fn estimator(&self) -> AccuracyEstimator {
        AccuracyEstimator::new()
            .with_n_iters(self.n_iters)
            .with_normalization(self.normalization)
            .with_failure_policy(self.failure_policy)
    }

    /// Sweep controller around [`SimParams::estimator`].
    #[must_use]
    pub fn controller(&self) -> SweepController {
        SweepController::new(self.estimator())
    }

    /// Shared generator seeded with `rng_seed`.
    #[must_use]
    pub fn rng(&self) -> MonteCarloRng {
        MonteCarloRng::new(self.rng_seed)
    }
}

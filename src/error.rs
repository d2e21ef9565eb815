//! Error types for re-identification experiments.
//!
//! Every failure is raised synchronously where it is detected and carried
//! up to the caller unchanged; nothing in the engine retries.

use std::fmt;

/// Main error type for reident operations.
///
/// # Examples
///
/// ```
/// use reident::error::ReidentError;
///
/// let err = ReidentError::InsufficientPopulation {
///     requested: 12,
///     available: 10,
/// };
/// assert!(err.to_string().contains("12"));
/// ```
#[derive(Debug)]
pub enum ReidentError {
    /// More candidates were requested than users exist in the population.
    InsufficientPopulation {
        /// Requested pool size N
        requested: usize,
        /// Number of users available
        available: usize,
    },

    /// The normalization statistic could not be computed or is not usable.
    DegenerateNormalization {
        /// What went wrong
        reason: String,
    },

    /// The injected classifier failed during fit or predict, or produced
    /// output the vote cannot use.
    ClassifierFailure {
        /// Name of the classifier configuration
        classifier: String,
        /// Underlying failure
        message: String,
    },

    /// A sweep was requested over zero valid points.
    EmptySweepRange {
        /// Why the range is empty
        reason: String,
    },

    /// Matrix dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter or configuration value.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// I/O error while reading configuration.
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for ReidentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReidentError::InsufficientPopulation {
                requested,
                available,
            } => {
                write!(
                    f,
                    "Insufficient population: requested {requested} candidates, only {available} users available"
                )
            }
            ReidentError::DegenerateNormalization { reason } => {
                write!(f, "Degenerate normalization: {reason}")
            }
            ReidentError::ClassifierFailure {
                classifier,
                message,
            } => {
                write!(f, "Classifier failure ({classifier}): {message}")
            }
            ReidentError::EmptySweepRange { reason } => {
                write!(f, "Empty sweep range: {reason}")
            }
            ReidentError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Matrix dimension mismatch: expected {expected}, got {actual}"
                )
            }
            ReidentError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            ReidentError::Io(e) => write!(f, "I/O error: {e}"),
            ReidentError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            ReidentError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ReidentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReidentError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReidentError {
    fn from(err: std::io::Error) -> Self {
        ReidentError::Io(err)
    }
}

impl From<serde_json::Error> for ReidentError {
    fn from(err: serde_json::Error) -> Self {
        ReidentError::Serialization(err.to_string())
    }
}

impl From<&str> for ReidentError {
    fn from(msg: &str) -> Self {
        ReidentError::Other(msg.to_string())
    }
}

impl From<String> for ReidentError {
    fn from(msg: String) -> Self {
        ReidentError::Other(msg)
    }
}

impl ReidentError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an invalid hyperparameter error
    #[must_use]
    pub fn invalid_hyperparameter(
        param: &str,
        value: impl fmt::Display,
        constraint: &str,
    ) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }

    /// Create a degenerate normalization error
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateNormalization {
            reason: reason.into(),
        }
    }

    /// Create an empty sweep range error
    #[must_use]
    pub fn empty_sweep(reason: impl Into<String>) -> Self {
        Self::EmptySweepRange {
            reason: reason.into(),
        }
    }

    /// Wraps any error raised by a classifier, tagging it with the
    /// configuration that raised it.
    #[must_use]
    pub fn classifier(classifier: &str, source: impl fmt::Display) -> Self {
        Self::ClassifierFailure {
            classifier: classifier.to_string(),
            message: source.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, ReidentError>;

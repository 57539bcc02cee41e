//! Error types for surrogate computation.

use thiserror::Error;

/// Errors raised while building a surrogate distribution.
///
/// Every variant aborts the whole batch: the orchestrator never returns a
/// partially filled distribution.
#[derive(Debug, Error)]
pub enum SurrogateError {
    /// Method identifier outside `0..=8`.
    #[error("{0} is not recognized as a valid surrogate method (expected 0..=8)")]
    InvalidMethod(i64),

    /// Method identifier is reserved but has no implementation.
    #[error("surrogate method {id} ({method}) is not implemented")]
    NotImplemented {
        /// Short name of the method.
        method: &'static str,
        /// Numeric identifier of the method.
        id: u8,
    },

    /// Axis is not valid for the tensor it is applied to.
    #[error("axis {axis} is out of range for a tensor of rank {ndim}")]
    InvalidAxis {
        /// Requested axis.
        axis: usize,
        /// Rank of the tensor.
        ndim: usize,
    },

    /// Two tensors that must agree in shape do not.
    #[error("shape mismatch in {context}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Operation that detected the mismatch.
        context: &'static str,
        /// Expected shape.
        expected: Vec<usize>,
        /// Shape actually supplied.
        found: Vec<usize>,
    },

    /// An index vector is not a permutation of `0..axis_len`.
    #[error("index vector of length {perm_len} is not a permutation of 0..{axis_len}")]
    InvalidPermutation {
        /// Length of the permuted axis.
        axis_len: usize,
        /// Length of the supplied index vector.
        perm_len: usize,
    },

    /// Worker count of zero.
    #[error("njobs must be at least 1")]
    InvalidJobs,

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The coupling statistic failed on one of the trials.
    #[error("coupling statistic failed on trial {trial}: {source}")]
    Statistic {
        /// Index of the failing trial.
        trial: usize,
        /// Error reported by the statistic.
        #[source]
        source: StatisticError,
    },
}

/// Result type for surrogate operations.
pub type SurrogateResult<T> = Result<T, SurrogateError>;

/// Errors reported by a [`PacStatistic`](crate::PacStatistic) implementation.
#[derive(Debug, Error)]
pub enum StatisticError {
    /// Parameters of the statistic are unusable.
    #[error("invalid statistic input: {0}")]
    InvalidInput(String),

    /// Phase and amplitude tensors cannot be paired.
    #[error("incompatible phase {pha:?} and amplitude {amp:?} shapes: {reason}")]
    Shape {
        /// Shape of the phase tensor.
        pha: Vec<usize>,
        /// Shape of the amplitude tensor.
        amp: Vec<usize>,
        /// What is wrong with them.
        reason: &'static str,
    },

    /// Error raised by a user supplied statistic.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl StatisticError {
    /// Wrap an arbitrary error raised by a custom statistic.
    pub fn custom(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StatisticError::Custom(source.into())
    }
}

/// A name that does not match any known variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{name}'")]
pub struct ParseNameError {
    /// What was being parsed ("statistic", "normalization").
    pub kind: &'static str,
    /// The rejected input.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn invalid_method_display_contains_id() {
        let msg = SurrogateError::InvalidMethod(99).to_string();
        assert!(msg.contains("99"), "got: {msg}");
    }

    #[test]
    fn not_implemented_display() {
        let err = SurrogateError::NotImplemented {
            method: "time-lag",
            id: 7,
        };
        assert_eq!(err.to_string(), "surrogate method 7 (time-lag) is not implemented");
    }

    #[test]
    fn invalid_axis_display() {
        let err = SurrogateError::InvalidAxis { axis: 5, ndim: 3 };
        assert_eq!(
            err.to_string(),
            "axis 5 is out of range for a tensor of rank 3"
        );
    }

    #[test]
    fn statistic_error_is_exposed_as_source() {
        let err = SurrogateError::Statistic {
            trial: 4,
            source: StatisticError::InvalidInput("bad".to_string()),
        };
        assert!(err.to_string().contains("trial 4"));
        assert!(err.source().is_some(), "Statistic must expose its source");
    }

    #[test]
    fn custom_statistic_error_is_transparent() {
        let err = StatisticError::custom("backend exploded");
        assert_eq!(err.to_string(), "backend exploded");
    }

    #[test]
    fn parse_name_error_display() {
        let err = ParseNameError {
            kind: "statistic",
            name: "plv".to_string(),
        };
        assert_eq!(err.to_string(), "unknown statistic 'plv'");
    }
}

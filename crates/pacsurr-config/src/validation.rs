//! Run configuration validation.
//!
//! Checks a [`RunConfig`](crate::RunConfig) against the method table and the
//! built-in statistic and normalization names before any tensor is loaded.
//!
//! # Example
//!
//! ```rust
//! use pacsurr_config::{RunConfig, validate_config};
//!
//! validate_config(&RunConfig::default()).expect("defaults are valid");
//! assert!(validate_config(&RunConfig::default().with_method(7)).is_err());
//! ```

use pacsurr_core::{Normalization, PacMethod, SurrogateError, SurrogateMethod};
use thiserror::Error;

use crate::RunConfig;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Method id outside 0..=8.
    #[error("unknown surrogate method: {0}")]
    UnknownMethod(i64),

    /// Method id reserved but not implemented.
    #[error("surrogate method {id} ({name}) is not implemented")]
    NotImplemented {
        /// Method id.
        id: u8,
        /// Method name.
        name: &'static str,
    },

    /// Unknown statistic name.
    #[error("unknown statistic: {0}")]
    UnknownStatistic(String),

    /// Unknown normalization name.
    #[error("unknown normalization: {0}")]
    UnknownNormalization(String),

    /// Field value not allowed.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Name of the field.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate the surrogate method id.
pub fn validate_method(method_id: i64) -> ValidationResult<SurrogateMethod> {
    let method =
        SurrogateMethod::from_id(method_id, 0, 0).map_err(|_| ValidationError::UnknownMethod(method_id))?;
    match method.ensure_implemented() {
        Ok(()) => Ok(method),
        Err(SurrogateError::NotImplemented { method: name, id }) => {
            Err(ValidationError::NotImplemented { id, name })
        }
        Err(_) => Err(ValidationError::UnknownMethod(method_id)),
    }
}

/// Validate a statistic name.
pub fn validate_statistic(name: &str) -> ValidationResult<PacMethod> {
    name.parse()
        .map_err(|_| ValidationError::UnknownStatistic(name.to_string()))
}

/// Validate a normalization name.
pub fn validate_normalization(name: &str) -> ValidationResult<Normalization> {
    name.parse()
        .map_err(|_| ValidationError::UnknownNormalization(name.to_string()))
}

/// Validate a whole run configuration.
///
/// Every problem is collected; a single problem is returned as is, several
/// as [`ValidationError::Multiple`].
pub fn validate_config(config: &RunConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    match validate_method(config.selector.method) {
        Ok(method) => {
            if method.randomizes() && config.nperm == 0 {
                errors.push(ValidationError::InvalidValue {
                    field: "nperm",
                    reason: format!("must be at least 1 for method {}", method.id()),
                });
            }
        }
        Err(e) => errors.push(e),
    }

    if config.njobs == 0 {
        errors.push(ValidationError::InvalidValue {
            field: "njobs",
            reason: "must be at least 1".to_string(),
        });
    }

    if let Err(e) = validate_statistic(&config.statistic.kind) {
        errors.push(e);
    }

    if config.statistic.n_bins < 2 {
        errors.push(ValidationError::InvalidValue {
            field: "n_bins",
            reason: format!("need at least 2 phase bins, got {}", config.statistic.n_bins),
        });
    }

    if let Err(e) = validate_normalization(&config.normalization) {
        errors.push(e);
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default() {
        assert!(validate_config(&RunConfig::default()).is_ok());
    }

    #[test]
    fn test_every_implemented_method_validates() {
        for id in 0..=6 {
            assert!(validate_method(id).is_ok(), "method {id}");
        }
    }

    #[test]
    fn test_reserved_methods() {
        assert_eq!(
            validate_method(7),
            Err(ValidationError::NotImplemented {
                id: 7,
                name: "time-lag"
            })
        );
        assert!(matches!(
            validate_method(8),
            Err(ValidationError::NotImplemented { id: 8, .. })
        ));
    }

    #[test]
    fn test_unknown_method() {
        assert_eq!(validate_method(-1), Err(ValidationError::UnknownMethod(-1)));
        assert_eq!(validate_method(9), Err(ValidationError::UnknownMethod(9)));
    }

    #[test]
    fn test_names() {
        assert_eq!(validate_statistic("KL"), Ok(PacMethod::KullbackLeibler));
        assert!(validate_statistic("glm").is_err());
        assert_eq!(validate_normalization("4"), Ok(Normalization::ZScore));
        assert!(validate_normalization("rank").is_err());
    }

    #[test]
    fn test_zero_nperm_only_matters_when_randomizing() {
        let config = RunConfig::default().with_nperm(0);
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidValue { field: "nperm", .. })
        ));
        assert!(validate_config(&config.with_method(0)).is_ok());
    }

    #[test]
    fn test_single_error_not_wrapped() {
        let config = RunConfig::default().with_njobs(0);
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidValue { field: "njobs", .. })
        ));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = RunConfig::default()
            .with_method(8)
            .with_njobs(0)
            .with_statistic("plv")
            .with_bins(1)
            .with_normalization("minmax");

        let Err(ValidationError::Multiple(errors)) = validate_config(&config) else {
            panic!("expected multiple errors");
        };
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::UnknownStatistic("plv".to_string())));
        assert!(errors.contains(&ValidationError::UnknownNormalization("minmax".to_string())));

        let msg = ValidationError::Multiple(errors).to_string();
        assert!(msg.contains("njobs"), "got: {msg}");
        assert!(msg.contains("n_bins"), "got: {msg}");
    }
}

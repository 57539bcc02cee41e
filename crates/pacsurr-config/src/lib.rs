//! Run configuration for pacsurr surrogate batches.
//!
//! A [`RunConfig`] bundles everything a surrogate batch needs besides the
//! data: the method selector, the coupling statistic, the trial count, the
//! worker count, the seed and the normalization. Configurations are stored
//! as TOML and validated against the method table before a run starts.
//!
//! # Example
//!
//! ```rust,no_run
//! use pacsurr_config::{RunConfig, validate_config, paths};
//!
//! let config = RunConfig::new("theta-gamma")
//!     .with_method(1)
//!     .with_statistic("kl")
//!     .with_nperm(500)
//!     .with_njobs(4);
//! validate_config(&config).unwrap();
//!
//! config.save(paths::user_runs_dir().join("theta-gamma.toml")).unwrap();
//! let engine = config.engine().unwrap();
//! ```

mod config;
mod error;

/// Platform-specific paths for configuration files.
pub mod paths;

/// Run configuration validation.
pub mod validation;

pub use config::{RunConfig, SelectorConfig, StatisticConfig};
pub use error::ConfigError;
pub use paths::{
    default_config_path, ensure_user_config_dir, find_config, user_config_dir, user_runs_dir,
};
pub use validation::{
    ValidationError, ValidationResult, validate_config, validate_method, validate_normalization,
    validate_statistic,
};

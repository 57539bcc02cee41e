//! Run configuration file format and operations.

use pacsurr_core::{
    CouplingStatistic, DEFAULT_NPERM, DEFAULT_PHASE_BINS, Normalization, PacMethod, SelectorArgs,
    SurrogateEngine, SurrogateMethod, SurrogateResult,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::paths::find_config;
use crate::validation::ValidationError;

/// Surrogate batch configuration.
///
/// Stored as TOML. Every field has a default, so an empty file is a valid
/// configuration.
///
/// # TOML Format
///
/// ```toml
/// name = "theta-gamma"
/// description = "Swap amplitude trials, 500 permutations"
/// nperm = 500
/// njobs = 4
/// seed = 7
/// normalization = "zscore"
///
/// [selector]
/// method = 3
/// shuffle_axis = 1
/// trial_axis = 2
///
/// [statistic]
/// kind = "kl"
/// n_bins = 18
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Name of the configuration.
    #[serde(default = "default_name")]
    pub name: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Surrogate method selection.
    #[serde(default)]
    pub selector: SelectorConfig,

    /// Coupling statistic used for observed and surrogate values.
    #[serde(default)]
    pub statistic: StatisticConfig,

    /// Number of surrogate trials.
    #[serde(default = "default_nperm")]
    pub nperm: usize,

    /// Worker count.
    #[serde(default = "default_njobs")]
    pub njobs: usize,

    /// Base seed for the per-trial random streams.
    #[serde(default)]
    pub seed: u64,

    /// Normalization of the observed statistic against the surrogates.
    #[serde(default = "default_normalization")]
    pub normalization: String,
}

/// Method id and axis parameters, as passed to the selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Surrogate method id (0..=8).
    #[serde(default = "default_method")]
    pub method: i64,

    /// Axis shuffled by methods 4-6.
    #[serde(default = "default_shuffle_axis")]
    pub shuffle_axis: usize,

    /// Trial axis permuted by methods 1-3.
    #[serde(default = "default_trial_axis")]
    pub trial_axis: usize,
}

/// Built-in statistic selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatisticConfig {
    /// Statistic name (`"mvl"` or `"kl"`).
    #[serde(default = "default_statistic")]
    pub kind: String,

    /// Number of phase bins for the KL statistic.
    #[serde(default = "default_n_bins")]
    pub n_bins: usize,
}

fn default_name() -> String {
    "default".to_string()
}

fn default_nperm() -> usize {
    DEFAULT_NPERM
}

fn default_njobs() -> usize {
    1
}

fn default_normalization() -> String {
    Normalization::ZScore.name().to_string()
}

fn default_method() -> i64 {
    3
}

fn default_shuffle_axis() -> usize {
    1
}

fn default_trial_axis() -> usize {
    2
}

fn default_statistic() -> String {
    PacMethod::MeanVectorLength.name().to_string()
}

fn default_n_bins() -> usize {
    DEFAULT_PHASE_BINS
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            shuffle_axis: default_shuffle_axis(),
            trial_axis: default_trial_axis(),
        }
    }
}

impl Default for StatisticConfig {
    fn default() -> Self {
        Self {
            kind: default_statistic(),
            n_bins: default_n_bins(),
        }
    }
}

impl RunConfig {
    /// Create a configuration with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            selector: SelectorConfig::default(),
            statistic: StatisticConfig::default(),
            nperm: default_nperm(),
            njobs: default_njobs(),
            seed: 0,
            normalization: default_normalization(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the surrogate method id.
    pub fn with_method(mut self, method: i64) -> Self {
        self.selector.method = method;
        self
    }

    /// Set the shuffle and trial axes.
    pub fn with_axes(mut self, shuffle_axis: usize, trial_axis: usize) -> Self {
        self.selector.shuffle_axis = shuffle_axis;
        self.selector.trial_axis = trial_axis;
        self
    }

    /// Set the statistic name.
    pub fn with_statistic(mut self, kind: impl Into<String>) -> Self {
        self.statistic.kind = kind.into();
        self
    }

    /// Set the number of phase bins.
    pub fn with_bins(mut self, n_bins: usize) -> Self {
        self.statistic.n_bins = n_bins;
        self
    }

    /// Set the number of surrogate trials.
    pub fn with_nperm(mut self, nperm: usize) -> Self {
        self.nperm = nperm;
        self
    }

    /// Set the worker count.
    pub fn with_njobs(mut self, njobs: usize) -> Self {
        self.njobs = njobs;
        self
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the normalization name.
    pub fn with_normalization(mut self, normalization: impl Into<String>) -> Self {
        self.normalization = normalization.into();
        self
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %config.name, "loaded run configuration");
        Ok(config)
    }

    /// Load a configuration by path, or by name from the user runs directory.
    pub fn find(name: &str) -> Result<Self, ConfigError> {
        let path = find_config(name).ok_or_else(|| ConfigError::NotFound(name.to_string()))?;
        Self::load(path)
    }

    /// Load a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), "saved run configuration");
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Selector arguments in the form the core crate accepts.
    pub fn selector_args(&self) -> SelectorArgs {
        SelectorArgs::new(
            self.selector.method,
            self.selector.shuffle_axis,
            self.selector.trial_axis,
        )
    }

    /// Resolve the surrogate method.
    pub fn surrogate_method(&self) -> SurrogateResult<SurrogateMethod> {
        self.selector_args().method()
    }

    /// Resolve the coupling statistic.
    pub fn statistic(&self) -> Result<CouplingStatistic, ValidationError> {
        let method: PacMethod = self
            .statistic
            .kind
            .parse()
            .map_err(|_| ValidationError::UnknownStatistic(self.statistic.kind.clone()))?;
        Ok(CouplingStatistic::new(method).with_bins(self.statistic.n_bins))
    }

    /// Resolve the normalization.
    pub fn normalization(&self) -> Result<Normalization, ValidationError> {
        self.normalization
            .parse()
            .map_err(|_| ValidationError::UnknownNormalization(self.normalization.clone()))
    }

    /// Build a surrogate engine from the selector, `nperm`, `njobs` and `seed`.
    pub fn engine(&self) -> SurrogateResult<SurrogateEngine> {
        Ok(SurrogateEngine::from_selector(&self.selector_args())?
            .with_nperm(self.nperm)
            .with_njobs(self.njobs)
            .with_seed(self.seed))
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(default_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.name, "default");
        assert_eq!(config.selector.method, 3);
        assert_eq!(config.selector.shuffle_axis, 1);
        assert_eq!(config.selector.trial_axis, 2);
        assert_eq!(config.statistic.kind, "mvl");
        assert_eq!(config.statistic.n_bins, 18);
        assert_eq!(config.nperm, 200);
        assert_eq!(config.njobs, 1);
        assert_eq!(config.seed, 0);
        assert_eq!(config.normalization, "zscore");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = RunConfig::from_toml("").unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
name = "theta-gamma"
nperm = 500

[selector]
method = 5

[statistic]
kind = "kl"
"#;
        let config = RunConfig::from_toml(toml).unwrap();
        assert_eq!(config.name, "theta-gamma");
        assert_eq!(config.nperm, 500);
        assert_eq!(config.selector.method, 5);
        assert_eq!(config.selector.trial_axis, 2);
        assert_eq!(config.statistic.kind, "kl");
        assert_eq!(config.statistic.n_bins, 18);
    }

    #[test]
    fn test_invalid_toml() {
        let err = RunConfig::from_toml("nperm = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_builder() {
        let config = RunConfig::new("run")
            .with_description("test run")
            .with_method(1)
            .with_axes(0, 3)
            .with_statistic("kl")
            .with_bins(12)
            .with_nperm(50)
            .with_njobs(4)
            .with_seed(9)
            .with_normalization("subtract");

        assert_eq!(config.description.as_deref(), Some("test run"));
        assert_eq!(config.selector_args(), SelectorArgs::new(1, 0, 3));
        assert_eq!(config.statistic.n_bins, 12);
        assert_eq!(config.nperm, 50);
        assert_eq!(config.njobs, 4);
        assert_eq!(config.seed, 9);
        assert_eq!(config.normalization().unwrap(), Normalization::Subtract);
    }

    #[test]
    fn test_resolves_core_types() {
        let config = RunConfig::default().with_statistic("kl").with_bins(9);
        assert_eq!(
            config.surrogate_method().unwrap(),
            SurrogateMethod::SwapAmplitude { trial_axis: 2 }
        );
        let stat = config.statistic().unwrap();
        assert_eq!(stat.method(), PacMethod::KullbackLeibler);
        assert_eq!(stat.n_bins(), 9);
        assert_eq!(config.normalization().unwrap(), Normalization::ZScore);
    }

    #[test]
    fn test_engine_carries_parameters() {
        let engine = RunConfig::default()
            .with_nperm(30)
            .with_njobs(2)
            .with_seed(5)
            .engine()
            .unwrap();
        assert_eq!(engine.nperm(), 30);
        assert_eq!(engine.njobs(), 2);
        assert_eq!(engine.seed(), 5);
    }

    #[test]
    fn test_unknown_names() {
        let config = RunConfig::default()
            .with_statistic("plv")
            .with_normalization("minmax");
        assert_eq!(
            config.statistic().unwrap_err(),
            ValidationError::UnknownStatistic("plv".to_string())
        );
        assert_eq!(
            config.normalization().unwrap_err(),
            ValidationError::UnknownNormalization("minmax".to_string())
        );
        assert!(RunConfig::default().with_method(12).engine().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("run.toml");
        let config = RunConfig::new("saved").with_method(6).with_seed(42);

        config.save(&path).unwrap();
        assert!(path.is_file());
        assert_eq!(RunConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_find_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("found.toml");
        RunConfig::new("found").with_nperm(9).save(&path).unwrap();

        let config = RunConfig::find(path.to_str().unwrap()).unwrap();
        assert_eq!(config.name, "found");
        assert_eq!(config.nperm, 9);
    }

    #[test]
    fn test_find_unknown_name() {
        let err = RunConfig::find("nonexistent_run_24680").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(ref name) if name == "nonexistent_run_24680"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RunConfig::load("/nonexistent/pacsurr/run.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}

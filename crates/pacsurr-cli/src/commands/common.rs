//! Shared CLI helpers: tensor files and configuration lookup.

use ndarray::{ArrayD, IxDyn};
use pacsurr_config::{RunConfig, default_config_path};
use pacsurr_core::Tensor;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Row-major tensor as stored on disk: `{ "shape": [..], "data": [..] }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TensorFile {
    /// Dimension lengths.
    pub shape: Vec<usize>,
    /// Elements in row-major order.
    pub data: Vec<f64>,
}

/// Errors converting a [`TensorFile`] into a tensor.
#[derive(Debug, Error)]
pub enum TensorFileError {
    /// `data` does not hold `product(shape)` elements.
    #[error("tensor shape {shape:?} needs {expected} values, found {found}")]
    Length {
        /// Declared shape.
        shape: Vec<usize>,
        /// Element count implied by the shape.
        expected: usize,
        /// Element count present.
        found: usize,
    },

    /// The element count of `shape` does not fit in `usize`.
    #[error("tensor shape {shape:?} is too large")]
    Overflow {
        /// Declared shape.
        shape: Vec<usize>,
    },

    /// Rank 0 tensors carry no channel axis.
    #[error("tensor must have at least one dimension")]
    Scalar,
}

impl TensorFile {
    /// Snapshot a tensor in row-major order.
    pub fn from_tensor(tensor: &Tensor) -> Self {
        Self {
            shape: tensor.shape().to_vec(),
            data: tensor.iter().copied().collect(),
        }
    }

    /// Convert into a tensor, checking the element count.
    pub fn into_tensor(self) -> Result<Tensor, TensorFileError> {
        if self.shape.is_empty() {
            return Err(TensorFileError::Scalar);
        }
        let Some(expected) = self
            .shape
            .iter()
            .try_fold(1usize, |acc, &len| acc.checked_mul(len))
        else {
            return Err(TensorFileError::Overflow { shape: self.shape });
        };
        if expected != self.data.len() {
            return Err(TensorFileError::Length {
                shape: self.shape,
                expected,
                found: self.data.len(),
            });
        }
        ArrayD::from_shape_vec(IxDyn(&self.shape), self.data).map_err(|_| TensorFileError::Scalar)
    }
}

/// Read a tensor from a JSON file.
pub fn read_tensor(path: &Path) -> anyhow::Result<Tensor> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read '{}': {e}", path.display()))?;
    let file: TensorFile = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("invalid tensor file '{}': {e}", path.display()))?;
    let tensor = file
        .into_tensor()
        .map_err(|e| anyhow::anyhow!("invalid tensor file '{}': {e}", path.display()))?;
    tracing::info!(path = %path.display(), shape = ?tensor.shape(), "loaded tensor");
    Ok(tensor)
}

/// Load a run configuration by name or path.
///
/// Without a name, the default configuration file is used when it exists,
/// and built-in defaults otherwise.
pub fn load_config(name: Option<&str>) -> anyhow::Result<RunConfig> {
    let Some(name) = name else {
        let path = default_config_path();
        if path.is_file() {
            return Ok(RunConfig::load(&path)?);
        }
        return Ok(RunConfig::default());
    };

    Ok(RunConfig::find(name)?)
}

/// Mean of all finite elements, or NaN when there are none.
pub fn finite_mean(x: &Tensor) -> f64 {
    let (sum, n) = x
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

//! Surrogate distributions and correction of observed coupling values.

use std::fmt;
use std::str::FromStr;

use ndarray::{ArrayViewD, Axis, IxDyn, Zip};

use crate::Tensor;
use crate::error::{ParseNameError, SurrogateError, SurrogateResult};

/// Stack of surrogate coupling tensors, shaped `(nperm, n_pha, n_amp, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurrogateDistribution {
    data: Tensor,
}

impl SurrogateDistribution {
    /// Wrap a stacked tensor. Axis 0 indexes permutations.
    pub fn new(data: Tensor) -> SurrogateResult<Self> {
        if data.ndim() == 0 {
            return Err(SurrogateError::InvalidAxis { axis: 0, ndim: 0 });
        }
        Ok(Self { data })
    }

    /// The stacked surrogate tensor.
    pub fn data(&self) -> &Tensor {
        &self.data
    }

    /// Consume the distribution, returning the stacked tensor.
    pub fn into_inner(self) -> Tensor {
        self.data
    }

    /// Number of permutations.
    pub fn nperm(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Shape of one surrogate coupling tensor.
    pub fn statistic_shape(&self) -> &[usize] {
        &self.data.shape()[1..]
    }

    /// Mean over permutations. NaN everywhere when `nperm == 0`.
    pub fn mean(&self) -> Tensor {
        self.data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Tensor::from_elem(IxDyn(self.statistic_shape()), f64::NAN))
    }

    /// Population standard deviation over permutations.
    pub fn std(&self) -> Tensor {
        let mean = self.mean();
        let mut acc = Tensor::zeros(IxDyn(self.statistic_shape()));
        for surrogate in self.data.axis_iter(Axis(0)) {
            Zip::from(&mut acc)
                .and(&surrogate)
                .and(&mean)
                .for_each(|acc, &x, &m| *acc += (x - m) * (x - m));
        }
        let n = self.nperm() as f64;
        acc.mapv(|v| (v / n).sqrt())
    }

    /// One-sided permutation p-values, `(#{surrogate >= observed} + 1) / (nperm + 1)`.
    pub fn p_values(&self, observed: ArrayViewD<'_, f64>) -> SurrogateResult<Tensor> {
        self.check_observed(&observed)?;
        let mut exceed = Tensor::zeros(IxDyn(self.statistic_shape()));
        for surrogate in self.data.axis_iter(Axis(0)) {
            Zip::from(&mut exceed)
                .and(&surrogate)
                .and(&observed)
                .for_each(|count, &s, &o| {
                    if s >= o {
                        *count += 1.0;
                    }
                });
        }
        let denom = self.nperm() as f64 + 1.0;
        Ok(exceed.mapv(|c| (c + 1.0) / denom))
    }

    /// Correct observed coupling values with the surrogate statistics.
    pub fn normalize(
        &self,
        observed: ArrayViewD<'_, f64>,
        norm: Normalization,
    ) -> SurrogateResult<Tensor> {
        self.check_observed(&observed)?;
        let out = match norm {
            Normalization::None => observed.to_owned(),
            Normalization::Subtract => &observed - &self.mean(),
            Normalization::Divide => &observed / &self.mean(),
            Normalization::SubtractDivide => {
                let mean = self.mean();
                (&observed - &mean) / &mean
            }
            Normalization::ZScore => (&observed - &self.mean()) / &self.std(),
        };
        Ok(out)
    }

    fn check_observed(&self, observed: &ArrayViewD<'_, f64>) -> SurrogateResult<()> {
        if observed.shape() == self.statistic_shape() {
            Ok(())
        } else {
            Err(SurrogateError::ShapeMismatch {
                context: "observed coupling",
                expected: self.statistic_shape().to_vec(),
                found: observed.shape().to_vec(),
            })
        }
    }
}

/// Correct observed values, passing them through when no surrogates exist.
pub fn normalize_pac(
    observed: ArrayViewD<'_, f64>,
    surrogates: Option<&SurrogateDistribution>,
    norm: Normalization,
) -> SurrogateResult<Tensor> {
    match surrogates {
        Some(dist) => dist.normalize(observed, norm),
        None => Ok(observed.to_owned()),
    }
}

/// How observed coupling is corrected by its surrogate distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Normalization {
    /// Leave the observed values unchanged.
    None,
    /// `observed - mean(surrogates)`
    Subtract,
    /// `observed / mean(surrogates)`
    Divide,
    /// `(observed - mean(surrogates)) / mean(surrogates)`
    SubtractDivide,
    /// `(observed - mean(surrogates)) / std(surrogates)`
    #[default]
    ZScore,
}

impl Normalization {
    /// Resolve a numeric identifier (0-4).
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            0 => Some(Self::None),
            1 => Some(Self::Subtract),
            2 => Some(Self::Divide),
            3 => Some(Self::SubtractDivide),
            4 => Some(Self::ZScore),
            _ => None,
        }
    }

    /// Numeric identifier.
    pub fn id(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Subtract => 1,
            Self::Divide => 2,
            Self::SubtractDivide => 3,
            Self::ZScore => 4,
        }
    }

    /// Short name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Subtract => "subtract",
            Self::Divide => "divide",
            Self::SubtractDivide => "subtract-divide",
            Self::ZScore => "zscore",
        }
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Normalization {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_lowercase();
        if let Ok(id) = name.parse::<i64>()
            && let Some(norm) = Self::from_id(id)
        {
            return Ok(norm);
        }
        match name.as_str() {
            "none" => Ok(Self::None),
            "subtract" | "sub" => Ok(Self::Subtract),
            "divide" | "div" => Ok(Self::Divide),
            "subtract-divide" | "subdiv" => Ok(Self::SubtractDivide),
            "zscore" | "z-score" => Ok(Self::ZScore),
            _ => Err(ParseNameError {
                kind: "normalization",
                name: s.to_string(),
            }),
        }
    }
}

//! Coupling statistics evaluated on each surrogate trial.
//!
//! The orchestrator only knows the [`PacStatistic`] trait. Any pure function
//! of a `(pha, amp)` pair can be plugged in, either as a type implementing
//! the trait or as a closure.
//!
//! Two classic estimators ship with the crate through [`CouplingStatistic`]:
//!
//! - **Mean Vector Length** (Canolty et al., 2006): length of the mean
//!   resultant of `amp * exp(i * pha)`, with amplitude normalized by its mean.
//! - **Kullback-Leibler modulation index** (Tort et al., 2010): divergence of
//!   the phase-binned mean amplitude from a uniform distribution, normalized
//!   to `[0, 1]` by `ln(n_bins)`.
//!
//! # Tensor layout
//!
//! Both estimators expect `pha` of shape `(n_pha, n_times, ...)` and `amp`
//! of shape `(n_amp, n_times, ...)` with identical trailing dimensions. The
//! result has shape `(n_pha, n_amp, ...)`.
//!
//! ```rust
//! use ndarray::{ArrayD, IxDyn};
//! use pacsurr_core::statistic::{CouplingStatistic, PacMethod, PacStatistic};
//!
//! let pha = ArrayD::<f64>::zeros(IxDyn(&[2, 256, 5]));
//! let amp = ArrayD::<f64>::ones(IxDyn(&[3, 256, 5]));
//! let pac = CouplingStatistic::new(PacMethod::KullbackLeibler)
//!     .compute(pha.view(), amp.view())
//!     .unwrap();
//! assert_eq!(pac.shape(), &[2, 3, 5]);
//! ```

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use ndarray::{Array3, ArrayView1, ArrayViewD, s};

use crate::Tensor;
use crate::error::{ParseNameError, StatisticError};

/// Default number of phase bins for the KL modulation index (20 degrees each).
pub const DEFAULT_PHASE_BINS: usize = 18;

/// A coupling statistic computed from a phase/amplitude tensor pair.
///
/// Implementations must be pure: the same inputs always give the same
/// output. They are shared across worker threads, hence the `Sync` bound.
pub trait PacStatistic: Sync {
    /// Compute the coupling tensor, shaped `(n_pha, n_amp, ...)`.
    fn compute(
        &self,
        pha: ArrayViewD<'_, f64>,
        amp: ArrayViewD<'_, f64>,
    ) -> Result<Tensor, StatisticError>;
}

impl<F> PacStatistic for F
where
    F: Fn(ArrayViewD<'_, f64>, ArrayViewD<'_, f64>) -> Result<Tensor, StatisticError> + Sync,
{
    fn compute(
        &self,
        pha: ArrayViewD<'_, f64>,
        amp: ArrayViewD<'_, f64>,
    ) -> Result<Tensor, StatisticError> {
        self(pha, amp)
    }
}

/// Estimator used by [`CouplingStatistic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacMethod {
    /// Mean Vector Length (Canolty et al., 2006).
    MeanVectorLength,

    /// Kullback-Leibler modulation index (Tort et al., 2010).
    KullbackLeibler,
}

impl PacMethod {
    /// Resolve a numeric identifier: 1 = MVL, 2 = KL.
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::MeanVectorLength),
            2 => Some(Self::KullbackLeibler),
            _ => None,
        }
    }

    /// Numeric identifier.
    pub fn id(&self) -> u8 {
        match self {
            Self::MeanVectorLength => 1,
            Self::KullbackLeibler => 2,
        }
    }

    /// Short name ("mvl" or "kl").
    pub fn name(&self) -> &'static str {
        match self {
            Self::MeanVectorLength => "mvl",
            Self::KullbackLeibler => "kl",
        }
    }
}

impl fmt::Display for PacMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PacMethod {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mvl" | "mean-vector-length" | "1" => Ok(Self::MeanVectorLength),
            "kl" | "kld" | "kullback-leibler" | "2" => Ok(Self::KullbackLeibler),
            _ => Err(ParseNameError {
                kind: "statistic",
                name: s.to_string(),
            }),
        }
    }
}

/// Built-in phase-amplitude coupling statistic.
///
/// The time axis is axis 1 of both tensors; every other trailing axis is
/// carried through to the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouplingStatistic {
    method: PacMethod,
    n_bins: usize,
}

impl CouplingStatistic {
    /// Create a statistic with [`DEFAULT_PHASE_BINS`] phase bins.
    pub fn new(method: PacMethod) -> Self {
        Self {
            method,
            n_bins: DEFAULT_PHASE_BINS,
        }
    }

    /// Set the number of phase bins (KL only).
    pub fn with_bins(mut self, n_bins: usize) -> Self {
        self.n_bins = n_bins;
        self
    }

    /// Get the estimator.
    pub fn method(&self) -> PacMethod {
        self.method
    }

    /// Get the number of phase bins.
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }
}

impl Default for CouplingStatistic {
    fn default() -> Self {
        Self::new(PacMethod::MeanVectorLength)
    }
}

impl PacStatistic for CouplingStatistic {
    fn compute(
        &self,
        pha: ArrayViewD<'_, f64>,
        amp: ArrayViewD<'_, f64>,
    ) -> Result<Tensor, StatisticError> {
        let shape_err = |reason| StatisticError::Shape {
            pha: pha.shape().to_vec(),
            amp: amp.shape().to_vec(),
            reason,
        };

        if self.n_bins < 2 {
            return Err(StatisticError::InvalidInput(format!(
                "at least 2 phase bins are required, got {}",
                self.n_bins
            )));
        }
        if pha.ndim() < 2 {
            return Err(shape_err("tensors need a bin axis and a time axis"));
        }
        if pha.ndim() != amp.ndim() || pha.shape()[1..] != amp.shape()[1..] {
            return Err(shape_err("dimensions after the bin axis must match"));
        }

        let n_pha = pha.shape()[0];
        let n_amp = amp.shape()[0];
        let n_times = pha.shape()[1];
        let rest = &pha.shape()[2..];
        let n_rest: usize = rest.iter().product();

        let pha3 = pha
            .to_shape((n_pha, n_times, n_rest))
            .map_err(|_| shape_err("cannot flatten trailing dimensions"))?;
        let amp3 = amp
            .to_shape((n_amp, n_times, n_rest))
            .map_err(|_| shape_err("cannot flatten trailing dimensions"))?;

        let mut out = Array3::<f64>::zeros((n_pha, n_amp, n_rest));
        for r in 0..n_rest {
            for i in 0..n_pha {
                let phase = pha3.slice(s![i, .., r]);
                match self.method {
                    PacMethod::MeanVectorLength => {
                        let (cos, sin): (Vec<f64>, Vec<f64>) =
                            phase.iter().map(|p| (p.cos(), p.sin())).unzip();
                        for j in 0..n_amp {
                            out[[i, j, r]] = mean_vector_length(&cos, &sin, amp3.slice(s![j, .., r]));
                        }
                    }
                    PacMethod::KullbackLeibler => {
                        let bins: Vec<usize> =
                            phase.iter().map(|&p| phase_bin(p, self.n_bins)).collect();
                        for j in 0..n_amp {
                            out[[i, j, r]] =
                                kl_modulation_index(&bins, amp3.slice(s![j, .., r]), self.n_bins);
                        }
                    }
                }
            }
        }

        let mut out_shape = vec![n_pha, n_amp];
        out_shape.extend_from_slice(rest);
        out.into_shape_with_order(out_shape)
            .map_err(|_| shape_err("cannot restore trailing dimensions"))
    }
}

/// Mean resultant length of `amp * exp(i * phase)`, amplitude normalized by
/// its mean.
fn mean_vector_length(cos: &[f64], sin: &[f64], amp: ArrayView1<'_, f64>) -> f64 {
    let n = cos.len();
    if n == 0 {
        return 0.0;
    }
    let amp_mean = amp.sum() / n as f64;
    if amp_mean <= 0.0 {
        return 0.0;
    }

    let (mut re, mut im) = (0.0, 0.0);
    for ((&c, &s), &a) in cos.iter().zip(sin).zip(amp.iter()) {
        re += a * c;
        im += a * s;
    }
    re.hypot(im) / n as f64 / amp_mean
}

/// Map a phase in radians to a bin index in `0..n_bins`, bin 0 starting at -PI.
fn phase_bin(phase: f64, n_bins: usize) -> usize {
    let wrapped = (phase + PI).rem_euclid(TAU);
    ((wrapped / (TAU / n_bins as f64)) as usize).min(n_bins - 1)
}

fn kl_modulation_index(bins: &[usize], amp: ArrayView1<'_, f64>, n_bins: usize) -> f64 {
    if bins.is_empty() {
        return 0.0;
    }

    let mut sums = vec![0.0; n_bins];
    let mut counts = vec![0usize; n_bins];
    for (&b, &a) in bins.iter().zip(amp.iter()) {
        sums[b] += a;
        counts[b] += 1;
    }

    let means: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();
    let total: f64 = means.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    // sum(p * ln(p / q)) with q = 1 / n_bins
    let kl: f64 = means
        .iter()
        .map(|&m| m / total)
        .filter(|&p| p > 1e-12)
        .map(|p| p * (p * n_bins as f64).ln())
        .sum();
    (kl / (n_bins as f64).ln()).clamp(0.0, 1.0)
}

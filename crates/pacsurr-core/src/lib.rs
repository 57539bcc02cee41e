//! PacSurr Core - Surrogate distributions for phase-amplitude coupling
//!
//! This crate estimates how likely an observed phase-amplitude coupling (PAC)
//! value is under a null hypothesis, by repeatedly breaking the relationship
//! between phase and amplitude and recomputing the coupling statistic:
//!
//! - [`permute`] - Axis-wise random permutation, the only randomization primitive
//! - [`method`] - The nine surrogate methods and their numeric identifiers
//! - [`statistic`] - The [`PacStatistic`] trait plus MVL and KL estimators
//! - [`surrogates`] - Parallel orchestration of `nperm` trials
//! - [`distribution`] - Surrogate statistics, p-values and normalization
//!
//! ## Tensor Layout
//!
//! Phase tensors are shaped `(n_pha, ...)` and amplitude tensors
//! `(n_amp, ...)`; all other dimensions (time, trials, channels) follow in
//! the same order in both. Phase and amplitude extraction (filtering, Hilbert
//! transform) happens upstream.
//!
//! ## Example Workflow
//!
//! ```rust
//! use ndarray::{ArrayD, IxDyn};
//! use pacsurr_core::{
//!     CouplingStatistic, Normalization, PacMethod, PacStatistic, SelectorArgs,
//!     compute_surrogates,
//! };
//!
//! // (n_pha, n_times, n_trials) and (n_amp, n_times, n_trials)
//! let pha = ArrayD::from_shape_fn(IxDyn(&[1, 500, 12]), |ix| (ix[1] as f64 * 0.2).sin());
//! let amp = ArrayD::from_shape_fn(IxDyn(&[2, 500, 12]), |ix| 1.0 + (ix[1] as f64 * 0.2).cos());
//!
//! let stat = CouplingStatistic::new(PacMethod::MeanVectorLength);
//! let observed = stat.compute(pha.view(), amp.view()).unwrap();
//!
//! // Shuffle amplitude time points (method 6) 100 times on 4 threads.
//! let selector = SelectorArgs::new(6, 1, 2);
//! let surrogates = compute_surrogates(pha.view(), amp.view(), &selector, &stat, 100, 4, 0)
//!     .unwrap()
//!     .expect("method 6 produces surrogates");
//!
//! let z = surrogates.normalize(observed.view(), Normalization::ZScore).unwrap();
//! let p = surrogates.p_values(observed.view()).unwrap();
//! assert_eq!(z.shape(), p.shape());
//! ```

pub mod distribution;
pub mod error;
pub mod method;
pub mod permute;
pub mod statistic;
pub mod surrogates;

/// Dense real-valued tensor of dynamic rank.
pub type Tensor = ndarray::ArrayD<f64>;

// Re-export main types
pub use distribution::{Normalization, SurrogateDistribution, normalize_pac};
pub use error::{ParseNameError, StatisticError, SurrogateError, SurrogateResult};
pub use method::{SelectorArgs, SurrogateMethod};
pub use permute::{apply_permutation, permute_axis, random_permutation};
pub use statistic::{CouplingStatistic, DEFAULT_PHASE_BINS, PacMethod, PacStatistic};
pub use surrogates::{DEFAULT_NPERM, SurrogateEngine, compute_surrogates, trial_rng};

//! Surrogate distribution orchestration.
//!
//! A surrogate batch runs `nperm` independent trials. Each trial randomizes
//! the `(pha, amp)` pair with the selected [`SurrogateMethod`], evaluates the
//! coupling statistic on the result and reports it tagged by its trial index.
//! The reports are stacked along a new leading axis.
//!
//! # Randomness
//!
//! Trial `k` draws from its own ChaCha8 stream: the generator is seeded from
//! the batch seed and switched to stream `k`. The distribution is therefore a
//! pure function of `(inputs, method, statistic, nperm, seed)` and does not
//! depend on `njobs` or on scheduling order.
//!
//! # Example
//!
//! ```rust
//! use ndarray::{ArrayD, IxDyn};
//! use pacsurr_core::{CouplingStatistic, PacMethod, SurrogateEngine, SurrogateMethod};
//!
//! let pha = ArrayD::from_shape_fn(IxDyn(&[2, 200, 8]), |ix| (ix[1] as f64 * 0.1).sin());
//! let amp = ArrayD::from_shape_fn(IxDyn(&[3, 200, 8]), |ix| 1.0 + (ix[1] as f64 * 0.1).cos());
//!
//! let dist = SurrogateEngine::new(SurrogateMethod::SwapAmplitude { trial_axis: 2 })
//!     .with_nperm(20)
//!     .with_njobs(2)
//!     .with_seed(7)
//!     .compute(pha.view(), amp.view(), &CouplingStatistic::new(PacMethod::MeanVectorLength))
//!     .unwrap()
//!     .expect("method 3 produces surrogates");
//!
//! assert_eq!(dist.data().shape(), &[20, 2, 3, 8]);
//! ```

use ndarray::{ArrayViewD, Axis, IxDyn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::Tensor;
use crate::distribution::SurrogateDistribution;
use crate::error::{SurrogateError, SurrogateResult};
use crate::method::{SelectorArgs, SurrogateMethod};
use crate::statistic::PacStatistic;

/// Default number of permutations.
pub const DEFAULT_NPERM: usize = 200;

/// Random generator for one trial of a batch seeded with `seed`.
pub fn trial_rng(seed: u64, trial: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(trial as u64);
    rng
}

/// Configured surrogate batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurrogateEngine {
    method: SurrogateMethod,
    nperm: usize,
    njobs: usize,
    seed: u64,
}

impl SurrogateEngine {
    /// Create an engine running [`DEFAULT_NPERM`] sequential trials with seed 0.
    pub fn new(method: SurrogateMethod) -> Self {
        Self {
            method,
            nperm: DEFAULT_NPERM,
            njobs: 1,
            seed: 0,
        }
    }

    /// Create an engine from a numeric selector bundle.
    pub fn from_selector(selector: &SelectorArgs) -> SurrogateResult<Self> {
        Ok(Self::new(selector.method()?))
    }

    /// Set the number of permutations.
    pub fn with_nperm(mut self, nperm: usize) -> Self {
        self.nperm = nperm;
        self
    }

    /// Set the number of worker threads (1 = run on the calling thread).
    pub fn with_njobs(mut self, njobs: usize) -> Self {
        self.njobs = njobs;
        self
    }

    /// Set the batch seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Get the surrogate method.
    pub fn method(&self) -> SurrogateMethod {
        self.method
    }

    /// Get the number of permutations.
    pub fn nperm(&self) -> usize {
        self.nperm
    }

    /// Get the number of worker threads.
    pub fn njobs(&self) -> usize {
        self.njobs
    }

    /// Get the batch seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Build the surrogate distribution.
    ///
    /// Returns `Ok(None)` for [`SurrogateMethod::NoSurrogates`] without ever
    /// calling the statistic. Any failing trial aborts the batch.
    pub fn compute<S: PacStatistic + ?Sized>(
        &self,
        pha: ArrayViewD<'_, f64>,
        amp: ArrayViewD<'_, f64>,
        statistic: &S,
    ) -> SurrogateResult<Option<SurrogateDistribution>> {
        self.compute_with_progress(pha, amp, statistic, &|_| {})
    }

    /// Like [`compute`](Self::compute), calling `progress(trial)` each time a
    /// trial finishes. With several workers the calls arrive concurrently and
    /// out of order.
    pub fn compute_with_progress<S, P>(
        &self,
        pha: ArrayViewD<'_, f64>,
        amp: ArrayViewD<'_, f64>,
        statistic: &S,
        progress: &P,
    ) -> SurrogateResult<Option<SurrogateDistribution>>
    where
        S: PacStatistic + ?Sized,
        P: Fn(usize) + Sync,
    {
        if self.njobs == 0 {
            return Err(SurrogateError::InvalidJobs);
        }
        self.method.ensure_implemented()?;
        if !self.method.randomizes() {
            tracing::debug!(method = %self.method, "no surrogates requested");
            return Ok(None);
        }

        tracing::debug!(
            method = %self.method,
            nperm = self.nperm,
            njobs = self.njobs,
            seed = self.seed,
            "surrogate batch start"
        );

        if self.nperm == 0 {
            // One unrecorded draw runs the same axis and shape checks as a
            // real trial and gives the shape of an empty distribution.
            let shape = self
                .run_trial(0, pha.view(), amp.view(), statistic)?
                .shape()
                .to_vec();
            let mut empty = vec![0];
            empty.extend(shape);
            return SurrogateDistribution::new(Tensor::zeros(IxDyn(&empty))).map(Some);
        }

        let trial = |k: usize| -> SurrogateResult<Tensor> {
            let result = self.run_trial(k, pha.view(), amp.view(), statistic);
            progress(k);
            result
        };

        let results = if self.njobs == 1 {
            (0..self.nperm).map(trial).collect::<SurrogateResult<Vec<_>>>()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.njobs)
                .thread_name(|i| format!("pacsurr-worker-{i}"))
                .build()?;
            pool.install(|| {
                (0..self.nperm)
                    .into_par_iter()
                    .map(trial)
                    .collect::<SurrogateResult<Vec<_>>>()
            })
        };

        let results = match results {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!(method = %self.method, error = %err, "surrogate batch aborted");
                return Err(err);
            }
        };

        let dist = stack_trials(&results)?;
        tracing::debug!(shape = ?dist.data().shape(), "surrogate batch done");
        Ok(Some(dist))
    }

    fn run_trial<S: PacStatistic + ?Sized>(
        &self,
        k: usize,
        pha: ArrayViewD<'_, f64>,
        amp: ArrayViewD<'_, f64>,
        statistic: &S,
    ) -> SurrogateResult<Tensor> {
        let mut rng = trial_rng(self.seed, k);
        let Some((pha_k, amp_k)) = self.method.randomize(pha, amp, &mut rng)? else {
            unreachable!("batches without surrogates return before dispatching trials");
        };
        tracing::trace!(trial = k, "trial randomized");
        statistic
            .compute(pha_k.view(), amp_k.view())
            .map_err(|source| SurrogateError::Statistic { trial: k, source })
    }
}

/// Stack per-trial tensors (ordered by trial index) along a new axis 0.
fn stack_trials(results: &[Tensor]) -> SurrogateResult<SurrogateDistribution> {
    let expected = results.first().map(|r| r.shape().to_vec()).unwrap_or_default();
    if let Some(bad) = results.iter().find(|r| r.shape() != expected.as_slice()) {
        return Err(SurrogateError::ShapeMismatch {
            context: "statistic output",
            expected,
            found: bad.shape().to_vec(),
        });
    }
    let views: Vec<ArrayViewD<'_, f64>> = results.iter().map(|r| r.view()).collect();
    let stacked = ndarray::stack(Axis(0), &views).map_err(|_| SurrogateError::ShapeMismatch {
        context: "statistic output",
        expected,
        found: Vec::new(),
    })?;
    SurrogateDistribution::new(stacked)
}

/// Compute the surrogate distribution of a coupling statistic.
///
/// Shorthand for [`SurrogateEngine`] configured from a selector bundle.
/// Returns `Ok(None)` when the selector asks for no surrogates (method 0).
pub fn compute_surrogates<S: PacStatistic + ?Sized>(
    pha: ArrayViewD<'_, f64>,
    amp: ArrayViewD<'_, f64>,
    selector: &SelectorArgs,
    statistic: &S,
    nperm: usize,
    njobs: usize,
    seed: u64,
) -> SurrogateResult<Option<SurrogateDistribution>> {
    SurrogateEngine::from_selector(selector)?
        .with_nperm(nperm)
        .with_njobs(njobs)
        .with_seed(seed)
        .compute(pha, amp, statistic)
}

//! Surrogate method selection.
//!
//! Each way of breaking the phase/amplitude relationship is a variant of
//! [`SurrogateMethod`]. Numeric identifiers (0-8) are only interpreted by
//! [`SurrogateMethod::from_id`]; the rest of the crate works on the enum.
//!
//! | id | method | effect |
//! |----|--------|--------|
//! | 0 | none | no randomization |
//! | 1 | swap phase/amplitude | one trial permutation shared by both tensors |
//! | 2 | swap phase | phase trials permuted |
//! | 3 | swap amplitude | amplitude trials permuted (Bahramisharif, 2013) |
//! | 4 | shuffle phase/amplitude | independent time shuffles of both |
//! | 5 | shuffle phase | phase time points shuffled |
//! | 6 | shuffle amplitude | amplitude time points shuffled |
//! | 7 | time lag | not implemented |
//! | 8 | circular shift | not implemented |

use std::fmt;

use ndarray::{ArrayViewD, Axis};
use rand::Rng;

use crate::Tensor;
use crate::error::{SurrogateError, SurrogateResult};
use crate::permute::{apply_permutation, check_axis, permute_axis, random_permutation};

/// Randomization policy used to build one surrogate trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurrogateMethod {
    /// No surrogates are computed.
    NoSurrogates,

    /// Phase and amplitude trials reordered by the same permutation
    /// (Tort, 2010).
    SwapPhaseAmplitude {
        /// Axis indexing trials.
        trial_axis: usize,
    },

    /// Phase trials reordered, amplitude untouched.
    SwapPhase {
        /// Axis indexing trials.
        trial_axis: usize,
    },

    /// Amplitude trials reordered, phase untouched.
    SwapAmplitude {
        /// Axis indexing trials.
        trial_axis: usize,
    },

    /// Phase and amplitude shuffled with two independent draws.
    ShufflePhaseAmplitude {
        /// Axis to shuffle, usually time.
        shuffle_axis: usize,
    },

    /// Phase shuffled, amplitude untouched.
    ShufflePhase {
        /// Axis to shuffle, usually time.
        shuffle_axis: usize,
    },

    /// Amplitude shuffled, phase untouched.
    ShuffleAmplitude {
        /// Axis to shuffle, usually time.
        shuffle_axis: usize,
    },

    /// Random time lag between phase and amplitude. Reserved.
    TimeLag,

    /// Circular shift of the amplitude. Reserved.
    CircularShift,
}

impl SurrogateMethod {
    /// Resolve a numeric method identifier.
    ///
    /// `shuffle_axis` is attached to the shuffling methods (4-6) and
    /// `trial_axis` to the swapping methods (1-3). Identifiers outside
    /// `0..=8` are rejected with [`SurrogateError::InvalidMethod`].
    pub fn from_id(id: i64, shuffle_axis: usize, trial_axis: usize) -> SurrogateResult<Self> {
        let method = match id {
            0 => Self::NoSurrogates,
            1 => Self::SwapPhaseAmplitude { trial_axis },
            2 => Self::SwapPhase { trial_axis },
            3 => Self::SwapAmplitude { trial_axis },
            4 => Self::ShufflePhaseAmplitude { shuffle_axis },
            5 => Self::ShufflePhase { shuffle_axis },
            6 => Self::ShuffleAmplitude { shuffle_axis },
            7 => Self::TimeLag,
            8 => Self::CircularShift,
            other => return Err(SurrogateError::InvalidMethod(other)),
        };
        Ok(method)
    }

    /// Every method, in identifier order.
    pub fn all(shuffle_axis: usize, trial_axis: usize) -> [Self; 9] {
        [
            Self::NoSurrogates,
            Self::SwapPhaseAmplitude { trial_axis },
            Self::SwapPhase { trial_axis },
            Self::SwapAmplitude { trial_axis },
            Self::ShufflePhaseAmplitude { shuffle_axis },
            Self::ShufflePhase { shuffle_axis },
            Self::ShuffleAmplitude { shuffle_axis },
            Self::TimeLag,
            Self::CircularShift,
        ]
    }

    /// Numeric identifier of the method.
    pub fn id(&self) -> u8 {
        match self {
            Self::NoSurrogates => 0,
            Self::SwapPhaseAmplitude { .. } => 1,
            Self::SwapPhase { .. } => 2,
            Self::SwapAmplitude { .. } => 3,
            Self::ShufflePhaseAmplitude { .. } => 4,
            Self::ShufflePhase { .. } => 5,
            Self::ShuffleAmplitude { .. } => 6,
            Self::TimeLag => 7,
            Self::CircularShift => 8,
        }
    }

    /// Short kebab-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoSurrogates => "none",
            Self::SwapPhaseAmplitude { .. } => "swap-pha-amp",
            Self::SwapPhase { .. } => "swap-pha",
            Self::SwapAmplitude { .. } => "swap-amp",
            Self::ShufflePhaseAmplitude { .. } => "shuffle-pha-amp",
            Self::ShufflePhase { .. } => "shuffle-pha",
            Self::ShuffleAmplitude { .. } => "shuffle-amp",
            Self::TimeLag => "time-lag",
            Self::CircularShift => "circular-shift",
        }
    }

    /// One-line human readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NoSurrogates => "No surrogates",
            Self::SwapPhaseAmplitude { .. } => "Swap phase/amplitude across trials (Tort, 2010)",
            Self::SwapPhase { .. } => "Swap phase across trials",
            Self::SwapAmplitude { .. } => "Swap amplitude across trials (Bahramisharif, 2013)",
            Self::ShufflePhaseAmplitude { .. } => "Shuffle phase and amplitude time-series",
            Self::ShufflePhase { .. } => "Shuffle phase time-series",
            Self::ShuffleAmplitude { .. } => "Shuffle amplitude time-series",
            Self::TimeLag => "Introduce a time lag",
            Self::CircularShift => "Circular shifting",
        }
    }

    /// Whether the method has an implementation.
    pub fn is_implemented(&self) -> bool {
        !matches!(self, Self::TimeLag | Self::CircularShift)
    }

    /// Whether the method produces randomized data at all.
    pub fn randomizes(&self) -> bool {
        !matches!(self, Self::NoSurrogates)
    }

    /// Fail with [`SurrogateError::NotImplemented`] for reserved methods.
    pub fn ensure_implemented(&self) -> SurrogateResult<()> {
        if self.is_implemented() {
            Ok(())
        } else {
            Err(SurrogateError::NotImplemented {
                method: self.name(),
                id: self.id(),
            })
        }
    }

    /// Produce one randomized `(pha, amp)` pair.
    ///
    /// Returns `Ok(None)` for [`SurrogateMethod::NoSurrogates`]. The inputs
    /// are never modified; a tensor the method does not touch is returned as
    /// an identical copy.
    pub fn randomize<R: Rng + ?Sized>(
        &self,
        pha: ArrayViewD<'_, f64>,
        amp: ArrayViewD<'_, f64>,
        rng: &mut R,
    ) -> SurrogateResult<Option<(Tensor, Tensor)>> {
        self.ensure_implemented()?;
        let pair = match *self {
            Self::NoSurrogates => return Ok(None),
            Self::SwapPhaseAmplitude { trial_axis } => {
                swap_phase_amplitude(pha, amp, trial_axis, rng)?
            }
            Self::SwapPhase { trial_axis } => {
                (permute_axis(pha, trial_axis, rng)?, amp.to_owned())
            }
            Self::SwapAmplitude { trial_axis } => {
                (pha.to_owned(), permute_axis(amp, trial_axis, rng)?)
            }
            Self::ShufflePhaseAmplitude { shuffle_axis } => {
                let pha = permute_axis(pha, shuffle_axis, rng)?;
                let amp = permute_axis(amp, shuffle_axis, rng)?;
                (pha, amp)
            }
            Self::ShufflePhase { shuffle_axis } => {
                (permute_axis(pha, shuffle_axis, rng)?, amp.to_owned())
            }
            Self::ShuffleAmplitude { shuffle_axis } => {
                (pha.to_owned(), permute_axis(amp, shuffle_axis, rng)?)
            }
            Self::TimeLag | Self::CircularShift => unreachable!("rejected by ensure_implemented"),
        };
        Ok(Some(pair))
    }
}

impl fmt::Display for SurrogateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.id())
    }
}

/// Apply one trial permutation to phase and amplitude jointly.
///
/// Concatenates both tensors along axis 0, permutes the result along
/// `trial_axis` and splits it back at the phase bin count. For any trial
/// axis other than 0 the same permutation is applied to each tensor
/// directly, which gives the same result without the copy. With
/// `trial_axis == 0` phase and amplitude bins are mixed across the split.
fn swap_phase_amplitude<R: Rng + ?Sized>(
    pha: ArrayViewD<'_, f64>,
    amp: ArrayViewD<'_, f64>,
    trial_axis: usize,
    rng: &mut R,
) -> SurrogateResult<(Tensor, Tensor)> {
    check_axis(trial_axis, pha.ndim())?;
    if pha.ndim() != amp.ndim() || pha.shape()[1..] != amp.shape()[1..] {
        let mut expected = amp.shape().to_vec();
        if let Some(bins) = expected.first_mut() {
            *bins = pha.len_of(Axis(0));
        }
        return Err(SurrogateError::ShapeMismatch {
            context: "phase/amplitude concatenation",
            expected,
            found: pha.shape().to_vec(),
        });
    }

    if trial_axis == 0 {
        let n_pha = pha.len_of(Axis(0));
        let joined = ndarray::concatenate(Axis(0), &[pha.view(), amp.view()]).map_err(|_| {
            SurrogateError::ShapeMismatch {
                context: "phase/amplitude concatenation",
                expected: pha.shape()[1..].to_vec(),
                found: amp.shape()[1..].to_vec(),
            }
        })?;
        let mixed = permute_axis(joined.view(), 0, rng)?;
        let (pha, amp) = mixed.view().split_at(Axis(0), n_pha);
        return Ok((pha.to_owned(), amp.to_owned()));
    }

    let perm = random_permutation(pha.len_of(Axis(trial_axis)), rng);
    let pha = apply_permutation(pha, trial_axis, &perm)?;
    let amp = apply_permutation(amp, trial_axis, &perm)?;
    Ok((pha, amp))
}

/// Argument bundle selecting a surrogate method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorArgs {
    /// Numeric method identifier (0-8).
    pub method_id: i64,
    /// Axis shuffled by methods 4-6.
    pub shuffle_axis: usize,
    /// Axis of trials swapped by methods 1-3.
    pub trial_axis: usize,
}

impl SelectorArgs {
    /// Create a selector bundle.
    pub fn new(method_id: i64, shuffle_axis: usize, trial_axis: usize) -> Self {
        Self {
            method_id,
            shuffle_axis,
            trial_axis,
        }
    }

    /// Resolve the bundle into a [`SurrogateMethod`].
    pub fn method(&self) -> SurrogateResult<SurrogateMethod> {
        SurrogateMethod::from_id(self.method_id, self.shuffle_axis, self.trial_axis)
    }
}

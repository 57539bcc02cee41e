//! Axis-wise random permutation of tensors.
//!
//! [`permute_axis`] is the only randomization primitive in the crate: every
//! surrogate method is expressed as one or more calls to it (or to
//! [`apply_permutation`] when the same draw must be shared).
//!
//! # Example
//!
//! ```rust
//! use ndarray::{ArrayD, IxDyn};
//! use pacsurr_core::permute::permute_axis;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let x = ArrayD::from_shape_fn(IxDyn(&[2, 5]), |ix| (ix[0] * 10 + ix[1]) as f64);
//! let mut rng = ChaCha8Rng::seed_from_u64(1);
//! let shuffled = permute_axis(x.view(), 1, &mut rng).unwrap();
//! assert_eq!(shuffled.shape(), x.shape());
//! ```

use ndarray::{ArrayD, ArrayViewD, Axis};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{SurrogateError, SurrogateResult};

/// Check that `axis` indexes a dimension of a rank-`ndim` tensor.
pub fn check_axis(axis: usize, ndim: usize) -> SurrogateResult<()> {
    if axis < ndim {
        Ok(())
    } else {
        Err(SurrogateError::InvalidAxis { axis, ndim })
    }
}

/// Draw a uniformly random permutation of `0..n` (Fisher-Yates).
pub fn random_permutation<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(rng);
    perm
}

/// Reorder `x` along `axis` so that `out[.., i, ..] = x[.., perm[i], ..]`.
///
/// The input is left untouched; a new tensor of the same shape is returned.
pub fn apply_permutation<A: Clone>(
    x: ArrayViewD<'_, A>,
    axis: usize,
    perm: &[usize],
) -> SurrogateResult<ArrayD<A>> {
    check_axis(axis, x.ndim())?;
    let axis_len = x.len_of(Axis(axis));
    if !is_permutation(perm, axis_len) {
        return Err(SurrogateError::InvalidPermutation {
            axis_len,
            perm_len: perm.len(),
        });
    }
    Ok(x.select(Axis(axis), perm))
}

/// Return a copy of `x` with its elements shuffled along `axis`.
///
/// Each call draws a fresh permutation from `rng`, so repeated calls are
/// independent and every ordering of the axis is equally likely.
pub fn permute_axis<A: Clone, R: Rng + ?Sized>(
    x: ArrayViewD<'_, A>,
    axis: usize,
    rng: &mut R,
) -> SurrogateResult<ArrayD<A>> {
    check_axis(axis, x.ndim())?;
    let perm = random_permutation(x.len_of(Axis(axis)), rng);
    apply_permutation(x, axis, &perm)
}

fn is_permutation(perm: &[usize], n: usize) -> bool {
    if perm.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &i in perm {
        if i >= n || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

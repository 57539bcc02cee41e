//! Property-based tests for the randomization primitives and surrogate methods.
//!
//! Tests shape preservation, value preservation and the shared trial
//! permutation of the phase/amplitude swap using proptest for randomized
//! tensor shapes and seeds.

use ndarray::{ArrayD, Axis, IxDyn};
use pacsurr_core::{SurrogateMethod, Tensor, permute_axis, trial_rng};
use proptest::prelude::*;

/// Tensor whose every element is unique: `base + linear index`.
fn unique_tensor(shape: &[usize], base: f64) -> Tensor {
    let n: usize = shape.iter().product();
    ArrayD::from_shape_vec(IxDyn(shape), (0..n).map(|v| base + v as f64).collect()).unwrap()
}

fn sorted_values(x: &Tensor) -> Vec<f64> {
    let mut v: Vec<f64> = x.iter().copied().collect();
    v.sort_by(f64::total_cmp);
    v
}

/// Shapes of rank 1..=4 with small dimensions.
fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..6, 1..=4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Permuting along any valid axis keeps the shape and the multiset of
    /// values, and moves whole slices.
    #[test]
    fn permute_axis_is_a_reordering(
        shape in shape_strategy(),
        axis_seed in 0usize..16,
        seed in any::<u64>(),
    ) {
        let x = unique_tensor(&shape, 0.0);
        let axis = axis_seed % shape.len();
        let mut rng = trial_rng(seed, 0);
        let out = permute_axis(x.view(), axis, &mut rng).unwrap();

        prop_assert_eq!(out.shape(), x.shape());
        prop_assert_eq!(sorted_values(&out), sorted_values(&x));
        for slice in out.axis_iter(Axis(axis)) {
            prop_assert!(x.axis_iter(Axis(axis)).any(|orig| orig == slice));
        }
    }

    /// Axes at or beyond the tensor rank are always rejected.
    #[test]
    fn permute_axis_rejects_invalid_axes(
        shape in shape_strategy(),
        extra in 0usize..4,
    ) {
        let x = unique_tensor(&shape, 0.0);
        let mut rng = trial_rng(0, 0);
        prop_assert!(permute_axis(x.view(), shape.len() + extra, &mut rng).is_err());
    }

    /// Method 1 applies one permutation to both tensors along the trial axis.
    #[test]
    fn swap_phase_amplitude_keeps_trials_paired(
        n_pha in 1usize..4,
        n_amp in 1usize..4,
        n_times in 1usize..6,
        n_trials in 1usize..8,
        seed in any::<u64>(),
    ) {
        // Tag = trial index, identical in both tensors.
        let pha = ArrayD::from_shape_fn(IxDyn(&[n_pha, n_times, n_trials]), |ix| ix[2] as f64);
        let amp = ArrayD::from_shape_fn(IxDyn(&[n_amp, n_times, n_trials]), |ix| ix[2] as f64);
        let mut rng = trial_rng(seed, 3);
        let (p, a) = SurrogateMethod::SwapPhaseAmplitude { trial_axis: 2 }
            .randomize(pha.view(), amp.view(), &mut rng)
            .unwrap()
            .unwrap();

        prop_assert_eq!(p.shape(), pha.shape());
        prop_assert_eq!(a.shape(), amp.shape());
        for t in 0..n_trials {
            let tag = p[[0, 0, t]];
            prop_assert!(a.index_axis(Axis(2), t).iter().all(|&v| v == tag));
            prop_assert!(p.index_axis(Axis(2), t).iter().all(|&v| v == tag));
        }
    }

    /// Single-tensor methods never alter the other tensor.
    #[test]
    fn untouched_tensor_is_identical(
        id in prop::sample::select(vec![2i64, 3, 5, 6]),
        n_times in 1usize..10,
        n_trials in 1usize..6,
        seed in any::<u64>(),
    ) {
        let pha = unique_tensor(&[2, n_times, n_trials], 0.0);
        let amp = unique_tensor(&[3, n_times, n_trials], 1000.0);
        let method = SurrogateMethod::from_id(id, 1, 2).unwrap();
        let mut rng = trial_rng(seed, 0);
        let (p, a) = method.randomize(pha.view(), amp.view(), &mut rng).unwrap().unwrap();

        if matches!(id, 2 | 5) {
            prop_assert_eq!(&a, &amp);
            prop_assert_eq!(sorted_values(&p), sorted_values(&pha));
        } else {
            prop_assert_eq!(&p, &pha);
            prop_assert_eq!(sorted_values(&a), sorted_values(&amp));
        }
    }
}

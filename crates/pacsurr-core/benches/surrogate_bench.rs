//! Criterion benchmarks for pacsurr-core components
//!
//! Run with: cargo bench -p pacsurr-core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ndarray::{ArrayD, IxDyn};
use pacsurr_core::{
    CouplingStatistic, PacMethod, PacStatistic, SurrogateEngine, SurrogateMethod, Tensor,
    permute_axis, trial_rng,
};
use std::f64::consts::TAU;

const N_TIMES: usize = 1000;
const N_TRIALS: usize = 20;

/// Phase tensor `(n_pha, N_TIMES, N_TRIALS)` of a 10-cycle oscillation.
fn generate_phase(n_pha: usize) -> Tensor {
    ArrayD::from_shape_fn(IxDyn(&[n_pha, N_TIMES, N_TRIALS]), |ix| {
        let theta = TAU * 10.0 * ix[1] as f64 / N_TIMES as f64 + ix[0] as f64;
        theta.sin().atan2(theta.cos())
    })
}

/// Amplitude tensor `(n_amp, N_TIMES, N_TRIALS)` loosely coupled to the phase.
fn generate_amplitude(n_amp: usize) -> Tensor {
    ArrayD::from_shape_fn(IxDyn(&[n_amp, N_TIMES, N_TRIALS]), |ix| {
        let theta = TAU * 10.0 * ix[1] as f64 / N_TIMES as f64;
        1.0 + 0.5 * theta.cos() + 0.01 * ix[2] as f64
    })
}

// ============================================================================
// Primitive benchmarks
// ============================================================================

fn bench_permute_axis(c: &mut Criterion) {
    let mut group = c.benchmark_group("Permute_Axis");
    let x = generate_amplitude(4);

    for (name, axis) in [("time", 1), ("trials", 2)] {
        group.bench_function(name, |b| {
            let mut rng = trial_rng(0, 0);
            b.iter(|| {
                let out = permute_axis(black_box(x.view()), axis, &mut rng).unwrap();
                black_box(out)
            })
        });
    }

    group.finish();
}

// ============================================================================
// Statistic benchmarks
// ============================================================================

fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("Statistic");
    let pha = generate_phase(4);
    let amp = generate_amplitude(4);

    for method in [PacMethod::MeanVectorLength, PacMethod::KullbackLeibler] {
        let stat = CouplingStatistic::new(method);
        group.bench_function(method.name(), |b| {
            b.iter(|| {
                let out = stat.compute(black_box(pha.view()), black_box(amp.view())).unwrap();
                black_box(out)
            })
        });
    }

    group.finish();
}

// ============================================================================
// Batch benchmarks
// ============================================================================

fn bench_surrogate_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Surrogate_Batch");
    group.sample_size(10);

    let pha = generate_phase(2);
    let amp = generate_amplitude(2);
    let stat = CouplingStatistic::new(PacMethod::MeanVectorLength);

    for &njobs in &[1usize, 2, 4] {
        let engine = SurrogateEngine::new(SurrogateMethod::SwapAmplitude { trial_axis: 2 })
            .with_nperm(100)
            .with_njobs(njobs);

        group.bench_with_input(BenchmarkId::from_parameter(njobs), &njobs, |b, _| {
            b.iter(|| {
                let dist = engine.compute(pha.view(), amp.view(), &stat).unwrap();
                black_box(dist)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_permute_axis,
    bench_statistics,
    bench_surrogate_batch,
);
criterion_main!(benches);

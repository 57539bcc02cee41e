//! Surrogate batch command.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use pacsurr_config::{RunConfig, validate_config};
use pacsurr_core::{PacStatistic, normalize_pac};
use serde::Serialize;
use std::path::PathBuf;

use super::common::{TensorFile, finite_mean, load_config, read_tensor};

#[derive(Args)]
pub struct RunArgs {
    /// Phase tensor (JSON: {"shape": [..], "data": [..]})
    #[arg(long, value_name = "FILE")]
    pha: PathBuf,

    /// Amplitude tensor (JSON: {"shape": [..], "data": [..]})
    #[arg(long, value_name = "FILE")]
    amp: PathBuf,

    /// Run configuration (name or path)
    #[arg(short, long)]
    config: Option<String>,

    /// Surrogate method id (see `pacsurr methods`)
    #[arg(short, long, allow_negative_numbers = true)]
    method: Option<i64>,

    /// Axis shuffled by methods 4-6
    #[arg(long)]
    shuffle_axis: Option<usize>,

    /// Trial axis swapped by methods 1-3
    #[arg(long)]
    trial_axis: Option<usize>,

    /// Number of surrogate trials
    #[arg(short, long)]
    nperm: Option<usize>,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    njobs: Option<usize>,

    /// Base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Coupling statistic (mvl, kl)
    #[arg(long)]
    statistic: Option<String>,

    /// Number of phase bins for the KL statistic
    #[arg(long)]
    n_bins: Option<usize>,

    /// Normalization (none, subtract, divide, subtract-divide, zscore)
    #[arg(long)]
    normalization: Option<String>,

    /// JSON report destination
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

/// JSON report written by `pacsurr run --output`.
#[derive(Serialize)]
struct Report {
    method: u8,
    method_name: &'static str,
    statistic: &'static str,
    n_bins: usize,
    nperm: usize,
    njobs: usize,
    seed: u64,
    normalization: &'static str,
    observed: TensorFile,
    normalized: TensorFile,
    p_values: Option<TensorFile>,
    surrogates: Option<TensorFile>,
}

fn apply_overrides(mut config: RunConfig, args: &RunArgs) -> RunConfig {
    if let Some(method) = args.method {
        config.selector.method = method;
    }
    if let Some(axis) = args.shuffle_axis {
        config.selector.shuffle_axis = axis;
    }
    if let Some(axis) = args.trial_axis {
        config.selector.trial_axis = axis;
    }
    if let Some(nperm) = args.nperm {
        config.nperm = nperm;
    }
    if let Some(njobs) = args.njobs {
        config.njobs = njobs;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(statistic) = &args.statistic {
        config.statistic.kind.clone_from(statistic);
    }
    if let Some(n_bins) = args.n_bins {
        config.statistic.n_bins = n_bins;
    }
    if let Some(normalization) = &args.normalization {
        config.normalization.clone_from(normalization);
    }
    config
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = apply_overrides(load_config(args.config.as_deref())?, &args);
    validate_config(&config)?;

    let stat = config.statistic()?;
    let norm = config.normalization()?;
    let engine = config.engine()?;
    let method = engine.method();

    tracing::info!(
        method = %method,
        statistic = %stat.method(),
        nperm = engine.nperm(),
        njobs = engine.njobs(),
        seed = engine.seed(),
        "starting surrogate run"
    );

    let pha = read_tensor(&args.pha)?;
    let amp = read_tensor(&args.amp)?;

    println!("Computing observed {} coupling...", stat.method());
    let observed = stat.compute(pha.view(), amp.view())?;

    let pb = if args.no_progress || !method.randomizes() {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(engine.nperm() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("##-"),
        );
        pb
    };

    println!("Computing surrogates with {method}...");
    let surrogates = engine.compute_with_progress(pha.view(), amp.view(), &stat, &|_| pb.inc(1));
    pb.finish_and_clear();
    let surrogates = surrogates?;

    let normalized = normalize_pac(observed.view(), surrogates.as_ref(), norm)?;
    let p_values = surrogates
        .as_ref()
        .map(|dist| dist.p_values(observed.view()))
        .transpose()?;

    println!("\nResults:");
    println!("  Method:          {method}");
    println!("  Statistic:       {}", stat.method());
    println!("  Coupling shape:  {:?}", observed.shape());
    println!("  Mean observed:   {:.6}", finite_mean(&observed));
    match &surrogates {
        Some(dist) => {
            println!("  Surrogates:      {}", dist.nperm());
            println!("  Mean surrogate:  {:.6}", finite_mean(dist.data()));
            println!("  Mean {:<11} {:.6}", format!("{norm}:"), finite_mean(&normalized));
        }
        None => println!("  Surrogates:      none"),
    }
    if let Some(p) = &p_values {
        let significant = p.iter().filter(|&&v| v < 0.05).count();
        println!("  p < 0.05:        {significant}/{}", p.len());
    }

    if let Some(output_path) = &args.output {
        let report = Report {
            method: method.id(),
            method_name: method.name(),
            statistic: stat.method().name(),
            n_bins: stat.n_bins(),
            nperm: engine.nperm(),
            njobs: engine.njobs(),
            seed: engine.seed(),
            normalization: norm.name(),
            observed: TensorFile::from_tensor(&observed),
            normalized: TensorFile::from_tensor(&normalized),
            p_values: p_values.as_ref().map(TensorFile::from_tensor),
            surrogates: surrogates.as_ref().map(|dist| TensorFile::from_tensor(dist.data())),
        };
        std::fs::write(output_path, serde_json::to_string_pretty(&report)?)?;
        println!("\nReport written to {}", output_path.display());
    }

    Ok(())
}

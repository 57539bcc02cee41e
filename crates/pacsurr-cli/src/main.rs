//! PacSurr CLI - Surrogate distributions for phase-amplitude coupling.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pacsurr")]
#[command(author, version, about = "Phase-amplitude coupling surrogate CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute coupling, surrogates, p-values and normalized coupling
    Run(commands::run::RunArgs),

    /// List the surrogate methods and their ids
    Methods(commands::methods::MethodsArgs),

    /// Create, show and validate run configurations
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Methods(args) => commands::methods::run(&args),
        Commands::Config(args) => commands::config::run(args),
    }
}

//! Run configuration commands.
//!
//! Write a default configuration, print the effective configuration, and
//! validate configuration files.

use clap::{Args, Subcommand};
use pacsurr_config::{RunConfig, default_config_path, ensure_user_config_dir, validate_config};
use std::path::PathBuf;

use super::common::load_config;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a default configuration file
    Init {
        /// Destination (defaults to the user config file)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show {
        /// Configuration name or path (defaults to the user config file)
        name: Option<String>,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration name or path
        name: String,
    },

    /// Show configuration paths
    Paths,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Init { path, force } => init_config(path, force),
        ConfigCommand::Show { name } => show_config(name.as_deref()),
        ConfigCommand::Validate { name } => validate(&name),
        ConfigCommand::Paths => show_paths(),
    }
}

fn init_config(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path,
        None => {
            ensure_user_config_dir()?;
            default_config_path()
        }
    };

    if path.exists() && !force {
        anyhow::bail!(
            "'{}' already exists. Use --force to overwrite.",
            path.display()
        );
    }

    RunConfig::default().save(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn show_config(name: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(name)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

fn validate(name: &str) -> anyhow::Result<()> {
    let config = load_config(Some(name))?;
    match validate_config(&config) {
        Ok(()) => {
            println!("'{}' is valid", config.name);
            Ok(())
        }
        Err(e) => anyhow::bail!("'{}' is invalid: {e}", config.name),
    }
}

fn show_paths() -> anyhow::Result<()> {
    println!("Configuration Paths:");
    println!("====================");
    println!("  User config dir: {}", pacsurr_config::user_config_dir().display());
    println!("  Named runs:      {}", pacsurr_config::user_runs_dir().display());
    println!("  Default config:  {}", default_config_path().display());
    Ok(())
}

//! Run configuration demo: build, validate and print configurations.
//!
//! Run with: cargo run -p pacsurr-config --example config_demo

use pacsurr_config::{RunConfig, paths, validate_config};

fn main() {
    println!("User config directory: {}", paths::user_config_dir().display());
    println!("Default config file:   {}\n", paths::default_config_path().display());

    let configs = [
        RunConfig::default(),
        RunConfig::new("tort-2010")
            .with_description("Swap phase/amplitude trials with the KL modulation index")
            .with_method(1)
            .with_statistic("kl")
            .with_nperm(500)
            .with_njobs(4),
        RunConfig::new("broken")
            .with_method(7)
            .with_njobs(0)
            .with_normalization("rank"),
    ];

    for config in &configs {
        println!("=== {} ===", config.name);
        match config.to_toml() {
            Ok(toml) => println!("{toml}"),
            Err(e) => println!("(cannot serialize: {e})"),
        }
        match validate_config(config) {
            Ok(()) => println!("valid\n"),
            Err(e) => println!("invalid: {e}\n"),
        }
    }
}

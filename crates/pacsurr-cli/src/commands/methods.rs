//! Surrogate method listing.

use clap::Args;
use pacsurr_core::SurrogateMethod;

#[derive(Args)]
pub struct MethodsArgs {
    /// Only list methods that are implemented
    #[arg(long)]
    implemented: bool,
}

pub fn run(args: &MethodsArgs) -> anyhow::Result<()> {
    println!("Surrogate Methods:");
    println!("==================");

    for method in SurrogateMethod::all(1, 2) {
        if args.implemented && !method.is_implemented() {
            continue;
        }
        let marker = if method.is_implemented() {
            ""
        } else {
            " [not implemented]"
        };
        println!(
            "  {}  {:16} {}{}",
            method.id(),
            method.name(),
            method.description(),
            marker
        );
    }

    println!();
    println!("Select a method with: pacsurr run --method <ID> ...");
    Ok(())
}

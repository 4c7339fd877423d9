use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, CompletionsArgs};

pub fn handle_completions(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "storefront", &mut std::io::stdout());
    Ok(())
}

/// Shown when `storefront` runs without a subcommand.
pub fn print_quickstart() {
    println!("storefront {}", storefront_core::VERSION);
    println!();
    println!("Quick start:");
    println!("  storefront list products --search sauce --sort -price");
    println!("  storefront list orders --filter status=pending,processing --last 7d");
    println!("  storefront stats reviews");
    println!("  storefront apply products toggle <ID> isActive");
    println!();
    println!("Snapshots are read from <data-dir>/<kind>.json (--data or STOREFRONT_DATA).");
    println!("Run `storefront --help` for all commands.");
}

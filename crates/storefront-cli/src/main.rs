//! Storefront CLI - list, filter and edit storefront data snapshots
//!
//! Reads `<kind>.json` snapshots from a data directory and runs the list
//! pipeline from `storefront-core` over them: query, dashboard stats and
//! single mutations written back atomically.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{apply, list, misc, stats};
use crate::errors::CliError;
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false, None);

        let (hint, code) = match e.downcast_ref::<CliError>() {
            Some(cli_error) => (
                cli_error.hint().map(str::to_string),
                cli_error.exit_code(),
            ),
            None => (extract_error_hint(&e), 1),
        };

        print_error(&ui_ctx, &format!("{}", e), hint.as_deref());
        std::process::exit(code);
    }
}

/// Log to stderr. The pipeline's own warnings are printed by the commands,
/// so the default level only lets errors through; STOREFRONT_LOG overrides.
fn init_tracing(quiet: bool) {
    let default_level = if quiet { "off" } else { "error" };
    let filter = EnvFilter::try_from_env(constants::env::LOG)
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Contextual hints for errors that do not carry one.
fn extract_error_hint(error: &anyhow::Error) -> Option<String> {
    let message = error.to_string().to_lowercase();

    if message.contains("failed to parse config") {
        return Some(
            "Hint: Check config.toml, or point STOREFRONT_CONFIG at another file.".to_string(),
        );
    }
    if message.contains("snapshot error") {
        return Some(
            "Hint: Snapshots must hold a JSON array of records, e.g. an exported list view."
                .to_string(),
        );
    }
    if message.contains("permission denied") {
        return Some("Hint: Ensure the data directory is writable.".to_string());
    }

    None
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::List(args)) => list::handle_list(ctx, args)?,
        Some(Commands::Stats(args)) => stats::handle_stats(ctx, args)?,
        Some(Commands::Apply(args)) => apply::handle_apply(ctx, args)?,
        Some(Commands::Completions(args)) => misc::handle_completions(args)?,
        None => misc::print_quickstart(),
    }
    Ok(())
}

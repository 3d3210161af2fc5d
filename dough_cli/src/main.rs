//! `dough` -- baker's-percentage dough calculator CLI.
//!
//! Parses arguments with clap, resolves settings and the preset library,
//! and dispatches to a command handler.

mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use dough_core::errors::FormulaError;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("dough=debug,dough_core=debug")
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => return,
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let result = RuntimeContext::from_global_args(&cli.global).and_then(|ctx| {
        tracing::debug!(presets = %ctx.presets_path.display(), verbose = ctx.verbose, "context resolved");
        match &cli.command {
            Commands::Formulate(args) => commands::formulate::run(&ctx, args),
            Commands::Blend(args) => commands::blend::run(&ctx, args),
            Commands::Convert(args) => commands::convert::run(&ctx, args),
            Commands::Flours => commands::flours::run(&ctx),
            Commands::Template => commands::template::run(&ctx),
            Commands::Preset(cmd) => commands::preset::run(&ctx, cmd),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        if cli.global.json {
            if let Some(formula_err) = e.downcast_ref::<FormulaError>() {
                if let Ok(json) = serde_json::to_string_pretty(formula_err) {
                    eprintln!("{}", json);
                }
            }
        }
        std::process::exit(1);
    }
}

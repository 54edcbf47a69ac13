//! xcgen CLI - plans Xcode targets from Bazel target specs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use xcgen::consolidate::ConsolidationError;
use xcgen::ops::{FocusError, LoadError};
use xcgen::util::diagnostic::{emit, Diagnostic};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        match diagnostic(&e) {
            Some(diagnostic) => emit(&diagnostic, color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let color = !cli.no_color;

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("xcgen=debug")
    } else {
        EnvFilter::new("xcgen=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Plan(args) => commands::plan::execute(args, color),
        Commands::Explain(args) => commands::explain::execute(args),
    }
}

/// Rich diagnostic for engine errors; other errors print their chain.
fn diagnostic(err: &anyhow::Error) -> Option<Diagnostic> {
    if let Some(e) = err.downcast_ref::<LoadError>() {
        return Some(e.to_diagnostic());
    }
    if let Some(e) = err.downcast_ref::<FocusError>() {
        return Some(e.to_diagnostic());
    }
    if let Some(e) = err.downcast_ref::<ConsolidationError>() {
        return Some(e.to_diagnostic());
    }
    None
}

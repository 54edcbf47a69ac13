//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// xcgen - Consolidates per-configuration Bazel targets into uniquely named
/// Xcode targets
#[derive(Parser)]
#[command(name = "xcgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the Xcode targets a set of target specs produces
    Plan(PlanArgs),

    /// Explain how the configurations of a label were consolidated and named
    Explain(ExplainArgs),
}

#[derive(Args)]
pub struct PlanArgs {
    /// Target spec files (JSON objects of target id to target)
    #[arg(required_unless_present = "dir")]
    pub files: Vec<PathBuf>,

    /// Also load every `*.json` file under this directory
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Only plan these labels and what they depend on (repeatable)
    #[arg(long, value_name = "LABEL")]
    pub focus: Vec<String>,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ExplainArgs {
    /// Bazel label to explain, e.g. `//app:App`
    pub label: String,

    /// Target spec files (JSON objects of target id to target)
    #[arg(required_unless_present = "dir")]
    pub files: Vec<PathBuf>,

    /// Also load every `*.json` file under this directory
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options.
//!
//! # Commands
//!
//! - `analyze`: Full analysis of a workspace document
//! - `health`: Health score only
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Analyze a workspace exported as JSON
//! monodeps analyze workspace.json
//!
//! # JSON report to a file, skipping legacy packages
//! monodeps analyze workspace.json --format json --output report.json --exclude '@acme/legacy-*'
//!
//! # Fail CI on warnings too
//! monodeps analyze workspace.json --strict
//!
//! # Health score
//! monodeps health workspace.yaml
//!
//! # Initialize configuration
//! monodeps init
//!
//! # Validate configuration
//! monodeps validate monodeps.yaml
//! ```

use crate::types::ReportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// MonoDeps - dependency-graph analysis for JavaScript/TypeScript monorepos.
#[derive(Parser, Debug)]
#[command(
    name = "monodeps",
    author,
    version,
    about = "Dependency-graph analysis for JavaScript/TypeScript monorepos",
    long_about = "MonoDeps reads a parsed workspace description, detects circular dependencies \
                  between workspace packages and version conflicts between external \
                  dependencies, scores workspace health, and explains how to break each cycle."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "MONODEPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a workspace for cycles and conflicts
    #[command(visible_alias = "a")]
    Analyze(AnalyzeArgs),

    /// Print the workspace health score
    Health(HealthArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Workspace document (JSON, or YAML by extension)
    #[arg(value_name = "FILE")]
    pub workspace: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Treat warnings as errors (exit code 1)
    #[arg(long)]
    pub strict: bool,

    /// Packages to exclude (exact, glob, or regex:-prefixed)
    #[arg(short, long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Skip fix strategies, guides and diagrams
    #[arg(long)]
    pub no_fix_strategies: bool,

    /// Analyze cycles in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Ignore devDependencies when looking for cycles
    #[arg(long)]
    pub no_dev_dependencies: bool,
}

/// Arguments for the health command.
#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Workspace document (JSON, or YAML by extension)
    #[arg(value_name = "FILE")]
    pub workspace: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE", default_value = "monodeps.yaml")]
    pub config: PathBuf,
}

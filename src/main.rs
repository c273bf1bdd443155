//! MonoDeps CLI entry point.
//!
//! This binary provides the command-line interface for MonoDeps.

use clap::Parser;
use monodeps::cli::{Cli, Commands};
use monodeps::reporter::Reporter;
use monodeps::{Analyzer, Config, MonodepsError};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            eprintln!("Error: {e}");

            let mut causes = e.chain().skip(1).peekable();
            if causes.peek().is_some() {
                eprintln!("\nCaused by:");
                for (i, cause) in causes.enumerate() {
                    eprintln!("  {i}: {cause}");
                }
            }

            let code = e
                .downcast_ref::<MonodepsError>()
                .map_or(1, MonodepsError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // RUST_LOG wins over the verbosity flag
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(format!("warn,monodeps={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Analyze(ref args) => {
            let mut config = load_config(&cli)?;
            config.merge_cli_args(args);
            config.validate()?;
            if args.output.is_some() {
                config.output.colored = false;
            }

            let workspace = monodeps::load_workspace(&args.workspace).await?;
            let result = Analyzer::new(&config).analyze(&workspace)?;

            let report = Reporter::new(&config)
                .with_strict(args.strict)
                .generate(&result, args.format)?;
            write_report(args.output.as_deref(), &report)?;

            let exit_code = if result.has_critical() {
                2
            } else if result.has_warnings() && args.strict {
                1
            } else {
                0
            };

            Ok(ExitCode::from(exit_code))
        }

        Commands::Health(ref args) => {
            let config = load_config(&cli)?;
            let workspace = monodeps::load_workspace(&args.workspace).await?;
            let health = Analyzer::new(&config).health(&workspace)?;

            let report = Reporter::new(&config).generate_health(&health, args.format)?;
            write_report(None, &report)?;

            Ok(ExitCode::from(0))
        }

        Commands::Init => {
            let config_path = Path::new("monodeps.yaml");

            if config_path.exists() {
                anyhow::bail!("Configuration file already exists: {}", config_path.display());
            }

            std::fs::write(config_path, Config::example_yaml())?;
            println!("Created example configuration: monodeps.yaml");
            Ok(ExitCode::from(0))
        }

        Commands::Validate(args) => match Config::from_file(&args.config) {
            Ok(_) => {
                println!("Configuration is valid: {}", args.config.display());
                Ok(ExitCode::from(0))
            }
            Err(e) => {
                eprintln!("Configuration error: {e}");
                Ok(ExitCode::from(1))
            }
        },
    }
}

fn write_report(output: Option<&Path>, report: &str) -> anyhow::Result<()> {
    if let Some(output_path) = output {
        std::fs::write(output_path, report)?;
        tracing::info!(path = %output_path.display(), "Report written");
    } else {
        println!("{report}");
    }
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = if let Some(ref config_path) = cli.config {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        Config::from_file(config_path)?
    } else if let Some(path) = Config::discover(Path::new(".")) {
        tracing::debug!(path = %path.display(), "Found configuration file");
        Config::from_file(&path)?
    } else {
        tracing::debug!("No configuration file found, using default configuration");
        Config::default()
    };

    if cli.verbose >= 2 {
        config.output.verbose = true;
    }
    Ok(config)
}

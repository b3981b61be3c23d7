//! `swarm`: inspect node types, validate workflows and build execution requests.
//!
//! JSON results go to stdout; logs go to stderr.

mod commands;
mod config;
mod error;

use clap::{Parser, Subcommand};
use config::CliConfig;
use error::CliError;
use rootcause::prelude::Report;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Validate and plan swarm workflows
#[derive(Parser)]
#[command(name = "swarm")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Node type catalog to merge over the built-in types
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every available node type
    Types,
    /// Validate a workflow document; exits non-zero if it is not valid
    Validate {
        /// Path to the workflow document (JSON)
        file: PathBuf,
    },
    /// Print the execution request for a valid workflow document
    Plan {
        /// Path to the workflow document (JSON)
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", CliError::Config { details: e.to_string() });
            return ExitCode::from(2);
        }
    };
    if cli.catalog.is_some() {
        config.catalog_path = cli.catalog.clone();
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter.as_str().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(report) => {
            error!(error = %report, "command failed");
            ExitCode::from(2)
        }
    }
}

fn run(command: Command, config: &CliConfig) -> Result<ExitCode, Report<CliError>> {
    let registry = commands::load_registry(config);

    match command {
        Command::Types => {
            print_json(&commands::types(&registry)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { file } => {
            let validation = commands::validate(&file, &registry, config)?;
            print_json(&commands::to_json(&validation)?)?;
            if let Some(error) = validation.error() {
                warn!(%error, "workflow is not valid");
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Plan { file } => {
            let request = commands::plan(&file, &registry, config)?;
            print_json(&commands::to_json(&request)?)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), Report<CliError>> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CliError::Output {
        details: e.to_string(),
    })?;
    println!("{text}");
    Ok(())
}

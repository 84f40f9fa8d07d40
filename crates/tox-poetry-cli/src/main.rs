//! tox-poetry CLI
//!
//! Drives the Poetry plugin against a project's tox configuration.

mod cli;
mod commands;
mod error;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    tox_poetry_core::logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("Failed to initialize logging: {e}")))?;
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Commands::Configure { root, json } => commands::run_configure(&resolve_root(root)?, json),
        Commands::Options { json } => commands::run_options(json),
        Commands::CreateEnv { env, root, python } => {
            commands::run_create_env(&resolve_root(root)?, &env, python.as_deref())
        }
    }
}

fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => Ok(std::env::current_dir()?),
    }
}

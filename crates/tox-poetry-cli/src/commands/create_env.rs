//! Create-env command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use tox_poetry_core::{CreateOutcome, HostConfig, Plugin, PoetryPlugin};

use super::plugin_registry;
use crate::error::{CliError, Result};

const INTERPRETER_NAMES: [&str; 2] = ["python3", "python"];

/// Run the creation hook for `env_name`
pub fn run_create_env(root: &Path, env_name: &str, python: Option<&Path>) -> Result<()> {
    let plugin = PoetryPlugin;
    let registry = plugin_registry(&plugin);
    let config = HostConfig::load(root, &registry)?;
    let env = config.env(env_name)?;

    let interpreter = match python {
        Some(path) => path.to_path_buf(),
        None => find_interpreter()?,
    };

    match plugin.create_env(&config, env, &interpreter)? {
        CreateOutcome::Handled => {
            println!(
                "{} {}: {} -> {}",
                "Linked".green().bold(),
                env_name.cyan(),
                env.env_python().display(),
                interpreter.display()
            );
        }
        CreateOutcome::NotHandled => {
            println!(
                "{} {}: a virtual environment is created as usual",
                "Not handled".yellow().bold(),
                env_name.cyan()
            );
        }
    }
    Ok(())
}

/// First `python3` or `python` on `PATH`
fn find_interpreter() -> Result<PathBuf> {
    for name in INTERPRETER_NAMES {
        match which::which(name) {
            Ok(path) => {
                tracing::debug!(interpreter = %path.display(), "Resolved interpreter");
                return Ok(path);
            }
            Err(e) => tracing::debug!(name, error = %e, "Interpreter not found"),
        }
    }
    Err(CliError::user(
        "No python interpreter found on PATH; pass one with --python",
    ))
}

//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tox-poetry - Inject Poetry dependencies and sources into tox environments
#[derive(Parser, Debug)]
#[command(name = "tox-poetry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the configuration pass and print the resulting environments
    ///
    /// Reads tox.toml (or [tool.tox] in pyproject.toml), applies the Poetry
    /// plugin and prints each environment's deps and set_env.
    ///
    /// Examples:
    ///   tox-poetry configure
    ///   tox-poetry configure --root ../service --json
    Configure {
        /// Project root (defaults to the current directory)
        #[arg(long, env = "TOX_POETRY_ROOT")]
        root: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the environment options the plugin registers
    Options {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Run the environment creation hook for one environment
    ///
    /// Only environments with poetry_experimental_no_virtual_env set are
    /// handled; they get a link to the interpreter instead of a virtual
    /// environment.
    CreateEnv {
        /// Name of the environment
        env: String,

        /// Project root (defaults to the current directory)
        #[arg(long, env = "TOX_POETRY_ROOT")]
        root: Option<PathBuf>,

        /// Interpreter to link (defaults to python3 or python on PATH)
        #[arg(long)]
        python: Option<PathBuf>,
    },
}

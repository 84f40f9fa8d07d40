//! Core of the tox-poetry plugin
//!
//! This crate sits between the Poetry project model and the host
//! orchestrator, implementing:
//!
//! - **Host model**: environments, the environment list, reserved internal
//!   environments and plugin-registered options ([`config`])
//! - **Index partitioning**: primary and extra package indexes derived from
//!   Poetry sources ([`index`])
//! - **Configuration merge**: dev, locked and index settings injected into
//!   each test environment ([`merge`])
//! - **Creation hook**: interpreter linking for environments that opt out of
//!   a virtual environment ([`venv`])
//!
//! # Architecture
//!
//! ```text
//!              tox-poetry-cli
//!                    |
//!             tox-poetry-core
//!                    |
//!               poetry-meta
//! ```
//!
//! # Example
//!
//! ```no_run
//! use tox_poetry_core::{HostConfig, OptionRegistry, Plugin, PoetryPlugin};
//! use std::path::Path;
//!
//! fn example() -> tox_poetry_core::Result<()> {
//!     let plugin = PoetryPlugin;
//!     let mut registry = OptionRegistry::new();
//!     plugin.add_options(&mut registry);
//!
//!     let mut config = HostConfig::load(Path::new("."), &registry)?;
//!     plugin.configure(&mut config)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod merge;
pub mod plugin;
pub mod venv;

pub use config::{EnvConfig, HostConfig, OptionDefinition, OptionKind, OptionRegistry, OptionValue};
pub use error::{Error, Result};
pub use index::{IndexServer, IndexServers};
pub use merge::{ConfigureReport, EnvReport, PoetryToggles, ProjectRequirements, SourceReposMode};
pub use plugin::{CreateOutcome, Plugin, PoetryPlugin};

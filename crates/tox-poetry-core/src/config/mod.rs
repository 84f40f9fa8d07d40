//! Host configuration model
//!
//! A minimal stand-in for the orchestrator's configuration object: the
//! environments of one run, which of them are test environments, and the
//! attributes plugins registered.

mod env;
mod host;
mod options;

pub use env::EnvConfig;
pub use host::{
    DEFAULT_ISOLATED_BUILD_ENV, DEFAULT_PROVISION_ENV, HostConfig, PYPROJECT_TOML, TOX_TOML,
};
pub use options::{OptionDefinition, OptionKind, OptionRegistry, OptionValue};

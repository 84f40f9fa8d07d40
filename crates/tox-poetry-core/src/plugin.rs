//! Plugin hooks and the Poetry plugin

use std::path::Path;

use crate::config::{EnvConfig, HostConfig, OptionKind, OptionRegistry, OptionValue};
use crate::error::Result;
use crate::merge::{
    self, ADD_DEV_DEPENDENCIES, ADD_LOCKED_DEPENDENCIES, ConfigureReport, NO_VIRTUAL_ENV,
    USE_SOURCE_REPOS,
};
use crate::venv;

/// Whether a plugin took over environment creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The plugin created the environment; the host must not
    Handled,
    /// The host creates the environment as usual
    NotHandled,
}

/// Hooks the host calls during a run, in this order
pub trait Plugin {
    fn name(&self) -> &str;

    /// Register per-environment attributes
    fn add_options(&self, registry: &mut OptionRegistry);

    /// Adjust the loaded configuration before environments are built
    fn configure(&self, config: &mut HostConfig) -> Result<ConfigureReport>;

    /// Optionally take over creation of `env`
    fn create_env(
        &self,
        _config: &HostConfig,
        _env: &EnvConfig,
        _interpreter: &Path,
    ) -> Result<CreateOutcome> {
        Ok(CreateOutcome::NotHandled)
    }
}

/// Injects Poetry dependencies and sources into tox environments
#[derive(Debug, Clone, Copy, Default)]
pub struct PoetryPlugin;

impl Plugin for PoetryPlugin {
    fn name(&self) -> &str {
        "poetry"
    }

    fn add_options(&self, registry: &mut OptionRegistry) {
        registry.add_testenv_attribute(
            ADD_DEV_DEPENDENCIES,
            OptionKind::Bool,
            "Add Poetry's 'dev-dependencies' to the test environment.",
            OptionValue::Bool(false),
        );
        registry.add_testenv_attribute(
            USE_SOURCE_REPOS,
            OptionKind::String,
            "Use Poetry's source repositories. Set 'pip_env_vars' to set as Pip environment variables ('PIP_INDEX_URL' and 'PIP_EXTRA_INDEX_URL').",
            OptionValue::String(None),
        );
        registry.add_testenv_attribute(
            NO_VIRTUAL_ENV,
            OptionKind::Bool,
            "Do not create a virtual environment, link the resolved interpreter instead.",
            OptionValue::Bool(false),
        );
        registry.add_testenv_attribute(
            ADD_LOCKED_DEPENDENCIES,
            OptionKind::Bool,
            "Add Poetry's locked dependencies from the lock file to the test environment.",
            OptionValue::Bool(false),
        );
    }

    fn configure(&self, config: &mut HostConfig) -> Result<ConfigureReport> {
        merge::configure(config)
    }

    fn create_env(
        &self,
        config: &HostConfig,
        env: &EnvConfig,
        interpreter: &Path,
    ) -> Result<CreateOutcome> {
        venv::create_env(config, env, interpreter)
    }
}

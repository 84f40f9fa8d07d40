//! Command implementations for tox-poetry-cli

pub mod configure;
pub mod create_env;
pub mod options;

pub use configure::run_configure;
pub use create_env::run_create_env;
pub use options::run_options;

use tox_poetry_core::{OptionRegistry, Plugin, PoetryPlugin};

/// A registry holding the options the Poetry plugin registers
pub(crate) fn plugin_registry(plugin: &PoetryPlugin) -> OptionRegistry {
    let mut registry = OptionRegistry::new();
    plugin.add_options(&mut registry);
    registry
}

//! A single tox environment as seen by plugins

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use super::options::OptionValue;

/// Configuration of one environment.
///
/// Plugins may only append to `deps` and add to `set_env`; everything else
/// is owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvConfig {
    pub name: String,
    /// Virtual environment directory
    pub env_dir: PathBuf,
    /// Requirements installed into the environment, in order
    pub deps: Vec<String>,
    /// Environment variables set when running commands
    pub set_env: BTreeMap<String, String>,
    /// Values of plugin-registered attributes
    pub attributes: BTreeMap<String, OptionValue>,
}

impl EnvConfig {
    pub fn new(name: impl Into<String>, env_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            env_dir: env_dir.into(),
            deps: Vec::new(),
            set_env: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set an attribute value, e.g. a plugin toggle
    pub fn with_attribute(mut self, name: &str, value: OptionValue) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    pub fn with_deps<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn with_set_env(mut self, key: &str, value: &str) -> Self {
        self.set_env.insert(key.to_string(), value.to_string());
        self
    }

    /// Boolean attribute, `false` when unset or not a bool
    pub fn bool_attribute(&self, name: &str) -> bool {
        self.attributes
            .get(name)
            .and_then(OptionValue::as_bool)
            .unwrap_or(false)
    }

    pub fn str_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(OptionValue::as_str)
    }

    /// Path of the interpreter inside the environment
    pub fn env_python(&self) -> PathBuf {
        if cfg!(windows) {
            self.env_dir.join("Scripts").join("python.exe")
        } else {
            self.env_dir.join("bin").join("python")
        }
    }
}

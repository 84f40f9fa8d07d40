//! Host orchestrator configuration
//!
//! Loaded from `tox.toml`, or from the `[tool.tox]` table of
//! `pyproject.toml` when there is no `tox.toml`:
//!
//! ```toml
//! env_list = ["py311", "lint"]
//!
//! [env.py311]
//! deps = ["pytest-cov"]
//! add_poetry_dev_dependencies = true
//! poetry_use_source_repos = "pip_env_vars"
//!
//! [env.lint]
//! set_env = { PIP_INDEX_URL = "https://mirror.example.com/simple" }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::env::EnvConfig;
use super::options::OptionRegistry;
use crate::error::{Error, Result};

pub const TOX_TOML: &str = "tox.toml";
pub const PYPROJECT_TOML: &str = "pyproject.toml";

/// Name of the environment tox uses to build the package
pub const DEFAULT_ISOLATED_BUILD_ENV: &str = ".package";
/// Name of the environment tox uses to provision itself
pub const DEFAULT_PROVISION_ENV: &str = ".tox";

#[derive(Debug, Default, Deserialize)]
struct RawHostConfig {
    #[serde(default)]
    env_list: Vec<String>,
    #[serde(default)]
    work_dir: Option<PathBuf>,
    #[serde(default)]
    isolated_build_env: Option<String>,
    #[serde(default)]
    provision_tox_env: Option<String>,
    #[serde(default)]
    env: toml::Table,
}

#[derive(Debug, Default, Deserialize)]
struct RawEnv {
    #[serde(default)]
    deps: Vec<String>,
    #[serde(default)]
    set_env: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawPyProject {
    #[serde(default)]
    tool: toml::Table,
}

/// Configuration of one orchestrator run
#[derive(Debug, Clone, Serialize)]
pub struct HostConfig {
    /// Project root, where `pyproject.toml` lives
    pub root: PathBuf,
    /// Directory holding environment directories
    pub work_dir: PathBuf,
    /// Environments the user asked to run
    pub env_list: Vec<String>,
    pub isolated_build_env: String,
    pub provision_tox_env: String,
    pub envs: BTreeMap<String, EnvConfig>,
}

impl HostConfig {
    /// An empty configuration rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            work_dir: root.join(".tox"),
            root,
            env_list: Vec::new(),
            isolated_build_env: DEFAULT_ISOLATED_BUILD_ENV.to_string(),
            provision_tox_env: DEFAULT_PROVISION_ENV.to_string(),
            envs: BTreeMap::new(),
        }
    }

    /// A fresh environment whose directory lives under `work_dir`
    pub fn new_env(&self, name: &str) -> EnvConfig {
        EnvConfig::new(name, self.work_dir.join(name))
    }

    /// Add an environment and list it in `env_list`
    pub fn add_env(&mut self, env: EnvConfig) {
        if !self.env_list.contains(&env.name) {
            self.env_list.push(env.name.clone());
        }
        self.envs.insert(env.name.clone(), env);
    }

    pub fn env(&self, name: &str) -> Result<&EnvConfig> {
        self.envs
            .get(name)
            .ok_or_else(|| Error::UnknownEnv(name.to_string()))
    }

    /// Whether `name` is a user-facing test environment.
    ///
    /// Internal environments (package build, provisioning) and environments
    /// missing from `env_list` are not.
    pub fn is_test_env(&self, name: &str) -> bool {
        let reserved = [self.isolated_build_env.as_str(), self.provision_tox_env.as_str()];
        !reserved.contains(&name) && self.env_list.iter().any(|e| e == name)
    }

    /// Names of every configured test environment
    pub fn test_env_names(&self) -> Vec<String> {
        self.envs
            .keys()
            .filter(|name| self.is_test_env(name))
            .cloned()
            .collect()
    }

    /// Load the configuration for the project at `root`
    pub fn load(root: &Path, registry: &OptionRegistry) -> Result<Self> {
        let tox_path = root.join(TOX_TOML);
        if tox_path.is_file() {
            let content = read(&tox_path)?;
            let table = parse_table(&tox_path, &content)?;
            return Self::from_table(root, &tox_path, table, registry);
        }

        let pyproject_path = root.join(PYPROJECT_TOML);
        if pyproject_path.is_file() {
            let content = read(&pyproject_path)?;
            let pyproject: RawPyProject = toml::from_str(&content).map_err(|e| Error::HostConfigParse {
                path: pyproject_path.clone(),
                message: e.message().to_string(),
            })?;
            if let Some(toml::Value::Table(table)) = pyproject.tool.get("tox") {
                return Self::from_table(root, &pyproject_path, table.clone(), registry);
            }
        }

        Err(Error::HostConfigNotFound {
            root: root.to_path_buf(),
        })
    }

    /// Parse `tox.toml` content as if it were found at `root`
    pub fn parse(root: &Path, content: &str, registry: &OptionRegistry) -> Result<Self> {
        let path = root.join(TOX_TOML);
        let table = parse_table(&path, content)?;
        Self::from_table(root, &path, table, registry)
    }

    fn from_table(
        root: &Path,
        path: &Path,
        table: toml::Table,
        registry: &OptionRegistry,
    ) -> Result<Self> {
        let raw: RawHostConfig = toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| Error::HostConfigParse {
                path: path.to_path_buf(),
                message: e.message().to_string(),
            })?;

        let mut config = Self::new(root);
        if let Some(work_dir) = raw.work_dir {
            config.work_dir = root.join(work_dir);
        }
        if let Some(name) = raw.isolated_build_env {
            config.isolated_build_env = name;
        }
        if let Some(name) = raw.provision_tox_env {
            config.provision_tox_env = name;
        }
        config.env_list = raw.env_list;

        for (name, value) in &raw.env {
            let toml::Value::Table(env_table) = value else {
                return Err(Error::HostConfigParse {
                    path: path.to_path_buf(),
                    message: format!("[env.{name}] must be a table"),
                });
            };
            let env_raw: RawEnv = toml::Value::Table(env_table.clone())
                .try_into()
                .map_err(|e: toml::de::Error| Error::HostConfigParse {
                    path: path.to_path_buf(),
                    message: format!("[env.{name}]: {}", e.message()),
                })?;

            let mut env = config.new_env(name);
            env.deps = env_raw.deps;
            env.set_env = env_raw.set_env;
            env.attributes = registry.resolve(name, env_table)?;
            config.envs.insert(name.clone(), env);
        }

        // Listed environments without a table still exist
        for name in config.env_list.clone() {
            if !config.envs.contains_key(&name) {
                let mut env = config.new_env(&name);
                env.attributes = registry.defaults();
                config.envs.insert(name, env);
            }
        }

        tracing::debug!(
            path = %path.display(),
            envs = config.envs.len(),
            "Loaded tox configuration"
        );
        Ok(config)
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

fn parse_table(path: &Path, content: &str) -> Result<toml::Table> {
    toml::from_str(content).map_err(|e: toml::de::Error| Error::HostConfigParse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

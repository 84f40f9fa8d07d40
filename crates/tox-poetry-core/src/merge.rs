//! The configuration merge pass.
//!
//! Runs once per orchestrator run, before any environment is built:
//!
//! 1. look for a Poetry project at the host's root (absent: nothing to do);
//! 2. collect locked pins, dev requirements and package indexes;
//! 3. append or export them on every test environment that opted in.
//!
//! Collection happens completely before the first environment is touched, so
//! a configuration error leaves every environment unmodified.

use poetry_meta::{LockedDependencies, NotApplicable, PoetryProject, ProjectLookup};
use serde::Serialize;

use crate::config::{EnvConfig, HostConfig};
use crate::error::Result;
use crate::index::IndexServers;

/// Append the project's development dependencies
pub const ADD_DEV_DEPENDENCIES: &str = "add_poetry_dev_dependencies";
/// How Poetry sources are exposed to the environment
pub const USE_SOURCE_REPOS: &str = "poetry_use_source_repos";
/// Link the system interpreter instead of creating a virtual environment
pub const NO_VIRTUAL_ENV: &str = "poetry_experimental_no_virtual_env";
/// Append pins from the lock file
pub const ADD_LOCKED_DEPENDENCIES: &str = "poetry_experimental_add_locked_dependencies";

/// `poetry_use_source_repos` value exporting sources as pip variables
pub const PIP_ENV_VARS: &str = "pip_env_vars";
/// Variable holding the primary index URL
pub const PIP_INDEX_URL: &str = "PIP_INDEX_URL";
/// Variable holding the space-separated extra index URLs
pub const PIP_EXTRA_INDEX_URL: &str = "PIP_EXTRA_INDEX_URL";

/// Ways of exposing Poetry sources to an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceReposMode {
    /// Export `PIP_INDEX_URL` and `PIP_EXTRA_INDEX_URL`
    PipEnvVars,
}

impl SourceReposMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            PIP_ENV_VARS => Some(Self::PipEnvVars),
            _ => None,
        }
    }
}

/// The plugin's toggles for one environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoetryToggles {
    pub add_dev_dependencies: bool,
    pub source_repos: Option<SourceReposMode>,
    pub no_virtual_env: bool,
    pub add_locked_dependencies: bool,
}

impl PoetryToggles {
    pub fn from_env(env: &EnvConfig) -> Self {
        let source_repos = env.str_attribute(USE_SOURCE_REPOS).and_then(|value| {
            let mode = SourceReposMode::parse(value);
            if mode.is_none() && !value.is_empty() {
                tracing::debug!(env = %env.name, value, "Unrecognized {USE_SOURCE_REPOS} value");
            }
            mode
        });
        Self {
            add_dev_dependencies: env.bool_attribute(ADD_DEV_DEPENDENCIES),
            source_repos,
            no_virtual_env: env.bool_attribute(NO_VIRTUAL_ENV),
            add_locked_dependencies: env.bool_attribute(ADD_LOCKED_DEPENDENCIES),
        }
    }
}

/// Everything the merge takes from the Poetry project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRequirements {
    /// Direct development dependencies as requirement strings
    pub dev: Vec<String>,
    /// Pins from the lock file
    pub locked: LockedDependencies,
    pub index_servers: IndexServers,
}

impl ProjectRequirements {
    /// Collect requirements and indexes from a loaded project.
    ///
    /// # Errors
    ///
    /// Returns `Error::MultipleDefaultSources` when the project declares
    /// more than one default source.
    pub fn collect(project: &PoetryProject) -> Result<Self> {
        let locked = project.locked_dependencies();
        let dev = project.dev_requirements();
        let index_servers = IndexServers::from_sources(project.sources())?;
        Ok(Self {
            dev,
            locked,
            index_servers,
        })
    }
}

/// What the merge did to one environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvReport {
    pub env: String,
    pub added_deps: Vec<String>,
    pub set_env: Vec<(String, String)>,
}

/// Outcome of a merge pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureReport {
    /// The project is not a Poetry project; nothing was touched
    Skipped { reason: NotApplicable },
    /// One report per test environment, in name order
    Applied { envs: Vec<EnvReport> },
}

impl ConfigureReport {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Report for `env`, if the pass was applied to it
    pub fn env(&self, env: &str) -> Option<&EnvReport> {
        match self {
            Self::Skipped { .. } => None,
            Self::Applied { envs } => envs.iter().find(|r| r.env == env),
        }
    }
}

/// Run the merge pass for the project at the host's root.
pub fn configure(config: &mut HostConfig) -> Result<ConfigureReport> {
    let project = match PoetryProject::load(&config.root) {
        ProjectLookup::Found(project) => project,
        ProjectLookup::NotApplicable(reason) => {
            tracing::debug!(%reason, "Not a Poetry project, leaving configuration untouched");
            return Ok(ConfigureReport::Skipped { reason });
        }
    };

    let requirements = ProjectRequirements::collect(&project)?;
    tracing::debug!(
        dev = requirements.dev.len(),
        locked_main = requirements.locked.main.len(),
        locked_dev = requirements.locked.dev.len(),
        primary = ?requirements.index_servers.primary.as_ref().map(|s| &s.name),
        "Collected Poetry requirements"
    );

    Ok(apply(config, &requirements))
}

/// Apply collected requirements to every test environment.
///
/// Entries are appended, never deduplicated: applying twice appends twice.
pub fn apply(config: &mut HostConfig, requirements: &ProjectRequirements) -> ConfigureReport {
    let mut reports = Vec::new();
    for name in config.test_env_names() {
        if let Some(env) = config.envs.get_mut(&name) {
            reports.push(apply_to_env(env, requirements));
        }
    }
    ConfigureReport::Applied { envs: reports }
}

fn apply_to_env(env: &mut EnvConfig, requirements: &ProjectRequirements) -> EnvReport {
    let toggles = PoetryToggles::from_env(env);
    let mut report = EnvReport {
        env: env.name.clone(),
        ..Default::default()
    };

    if toggles.add_locked_dependencies {
        report.added_deps.extend(requirements.locked.main.iter().cloned());
        if toggles.add_dev_dependencies {
            report.added_deps.extend(requirements.locked.dev.iter().cloned());
        }
    } else if toggles.add_dev_dependencies {
        report.added_deps.extend(requirements.dev.iter().cloned());
    }
    env.deps.extend(report.added_deps.iter().cloned());

    if toggles.source_repos == Some(SourceReposMode::PipEnvVars) {
        let servers = &requirements.index_servers;
        if let Some(primary) = &servers.primary {
            set_if_absent(env, &mut report, PIP_INDEX_URL, &primary.url);
        }
        if let Some(extra_urls) = servers.extra_index_urls() {
            set_if_absent(env, &mut report, PIP_EXTRA_INDEX_URL, &extra_urls);
        }
    }

    if !report.added_deps.is_empty() || !report.set_env.is_empty() {
        tracing::info!(
            env = %env.name,
            deps = report.added_deps.len(),
            vars = report.set_env.len(),
            "Applied Poetry configuration"
        );
    }
    report
}

fn set_if_absent(env: &mut EnvConfig, report: &mut EnvReport, key: &str, value: &str) {
    if env.set_env.contains_key(key) {
        tracing::debug!(env = %env.name, key, "Keeping user-defined variable");
        return;
    }
    env.set_env.insert(key.to_string(), value.to_string());
    report.set_env.push((key.to_string(), value.to_string()));
}

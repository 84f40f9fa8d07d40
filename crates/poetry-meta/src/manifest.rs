//! `pyproject.toml` loading.
//!
//! A project is only a Poetry project when its manifest carries a
//! `[tool.poetry]` section. Anything else (no manifest, an unreadable one, or
//! one written for another build backend) is reported as
//! [`ProjectLookup::NotApplicable`] rather than as an error.
//!
//! # Example TOML
//!
//! ```toml
//! [tool.poetry]
//! name = "demo"
//! version = "0.1.0"
//!
//! [tool.poetry.dependencies]
//! python = "^3.8"
//! attrs = "^22.2"
//!
//! [tool.poetry.dev-dependencies]
//! pytest = "^7.0"
//!
//! [[tool.poetry.source]]
//! name = "internal"
//! url = "https://pypi.example.com/simple"
//! default = true
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dependency::DependencySpec;
use crate::error::Error;
use crate::lockfile::{LockFile, LockedDependencies};
use crate::requirement::to_pep_508;
use crate::source::SourceRepository;
use crate::{LOCK_FILENAME, MANIFEST_FILENAME};

/// Name of the dependency group Poetry treats as development dependencies
const DEV_GROUP: &str = "dev";

#[derive(Debug, Deserialize)]
struct PyProject {
    #[serde(default)]
    tool: Option<Tool>,
}

#[derive(Debug, Deserialize)]
struct Tool {
    #[serde(default)]
    poetry: Option<PoetrySection>,
}

/// The `[tool.poetry]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct PoetrySection {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Legacy development dependencies table
    #[serde(default)]
    pub dev_dependencies: toml::Table,
    /// `[tool.poetry.group.<name>]` tables
    #[serde(default)]
    pub group: BTreeMap<String, DependencyGroup>,
    #[serde(default)]
    pub source: Vec<SourceRepository>,
}

/// A `[tool.poetry.group.<name>]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DependencyGroup {
    #[serde(default)]
    pub dependencies: toml::Table,
}

/// Why a directory is not treated as a Poetry project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotApplicable {
    ManifestMissing { path: PathBuf },
    ManifestInvalid { path: PathBuf, message: String },
    NoPoetrySection { path: PathBuf },
}

impl fmt::Display for NotApplicable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManifestMissing { path } => write!(f, "no manifest at {}", path.display()),
            Self::ManifestInvalid { path, message } => {
                write!(f, "unreadable manifest at {}: {}", path.display(), message)
            }
            Self::NoPoetrySection { path } => {
                write!(f, "no [tool.poetry] section in {}", path.display())
            }
        }
    }
}

/// Outcome of looking for a Poetry project
#[derive(Debug, Clone)]
pub enum ProjectLookup {
    Found(PoetryProject),
    NotApplicable(NotApplicable),
}

/// A loaded Poetry project
#[derive(Debug, Clone)]
pub struct PoetryProject {
    root: PathBuf,
    section: PoetrySection,
}

impl PoetryProject {
    /// Look for a Poetry project at `root`
    pub fn load(root: &Path) -> ProjectLookup {
        let path = root.join(MANIFEST_FILENAME);
        if !path.is_file() {
            return ProjectLookup::NotApplicable(NotApplicable::ManifestMissing { path });
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(root, &content),
            Err(e) => ProjectLookup::NotApplicable(NotApplicable::ManifestInvalid {
                message: Error::io(&path, e).to_string(),
                path,
            }),
        }
    }

    /// Interpret manifest content as if it were found at `root`
    pub fn parse(root: &Path, content: &str) -> ProjectLookup {
        let path = root.join(MANIFEST_FILENAME);
        let pyproject: PyProject = match toml::from_str(content) {
            Ok(pyproject) => pyproject,
            Err(e) => {
                return ProjectLookup::NotApplicable(NotApplicable::ManifestInvalid {
                    message: e.message().to_string(),
                    path,
                });
            }
        };

        match pyproject.tool.and_then(|tool| tool.poetry) {
            Some(section) => ProjectLookup::Found(Self {
                root: root.to_path_buf(),
                section,
            }),
            None => ProjectLookup::NotApplicable(NotApplicable::NoPoetrySection { path }),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> Option<&str> {
        self.section.name.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.section.version.as_deref()
    }

    /// Declared package sources, in declared order
    pub fn sources(&self) -> &[SourceRepository] {
        &self.section.source
    }

    pub fn lock_file_path(&self) -> PathBuf {
        self.root.join(LOCK_FILENAME)
    }

    /// Development dependency declarations: the legacy `dev-dependencies`
    /// table followed by the `dev` group, each in declared order.
    pub fn dev_dependencies(&self) -> impl Iterator<Item = (&str, &toml::Value)> {
        let group = self
            .section
            .group
            .get(DEV_GROUP)
            .map(|g| &g.dependencies)
            .into_iter()
            .flatten();
        self.section
            .dev_dependencies
            .iter()
            .chain(group)
            .filter(|(name, _)| !name.eq_ignore_ascii_case("python"))
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Development dependencies rendered as PEP 508 requirement strings.
    ///
    /// Declarations Poetry would reject are skipped with a warning.
    pub fn dev_requirements(&self) -> Vec<String> {
        let mut requirements = Vec::new();
        for (name, value) in self.dev_dependencies() {
            match DependencySpec::from_value(value) {
                Some(spec) => requirements.extend(to_pep_508(name, &spec, &self.root)),
                None => tracing::warn!(dependency = name, "Skipping unrecognized dependency declaration"),
            }
        }
        requirements
    }

    /// Pinned requirements from `poetry.lock`.
    ///
    /// A missing lock file yields empty lists; an unreadable one is logged
    /// and treated the same way.
    pub fn locked_dependencies(&self) -> LockedDependencies {
        match LockFile::load(&self.lock_file_path()) {
            Ok(Some(lock)) => lock.partition(),
            Ok(None) => {
                tracing::debug!(root = %self.root.display(), "No lock file");
                LockedDependencies::default()
            }
            Err(e) => {
                tracing::warn!("Ignoring lock file: {e}");
                LockedDependencies::default()
            }
        }
    }
}

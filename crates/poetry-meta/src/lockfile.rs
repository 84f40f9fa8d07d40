//! `poetry.lock` reading.
//!
//! Only the parts of `[[package]]` entries needed to pin a test environment
//! are modelled: name, version and the category the package belongs to.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Dependency category recorded for a locked package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Main,
    Dev,
}

/// A `[[package]]` entry of the lock file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LockedPackage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Poetry < 1.5
    #[serde(default)]
    pub category: Option<String>,
    /// Poetry >= 2.0
    #[serde(default)]
    pub groups: Vec<String>,
}

impl LockedPackage {
    /// The category this package is installed for, if it is one we track.
    ///
    /// Entries without any category information belong to `main`. Lock files
    /// written by Poetry 1.5 to 1.8 record neither `category` nor `groups`,
    /// so every package in them, dev-only ones included, is `main`.
    pub fn category(&self) -> Option<Category> {
        match self.category.as_deref() {
            Some("main") => Some(Category::Main),
            Some("dev") => Some(Category::Dev),
            Some(_) => None,
            None if self.groups.is_empty() => Some(Category::Main),
            None if self.groups.iter().any(|g| g == "main") => Some(Category::Main),
            None if self.groups.iter().any(|g| g == "dev") => Some(Category::Dev),
            None => None,
        }
    }

    /// `name==version`, or `None` if either half is missing.
    pub fn requirement(&self) -> Option<String> {
        match (&self.name, &self.version) {
            (Some(name), Some(version)) => Some(format!("{name}=={version}")),
            _ => None,
        }
    }
}

/// Parsed `poetry.lock`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LockFile {
    #[serde(default)]
    pub package: Vec<LockedPackage>,
}

/// Pinned requirements, split by category, in lock-file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LockedDependencies {
    pub main: Vec<String>,
    pub dev: Vec<String>,
}

impl LockedDependencies {
    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.dev.is_empty()
    }
}

impl LockFile {
    /// Parse lock-file content
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a lock file, returning `Ok(None)` when it does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content)
            .map(Some)
            .map_err(|e| Error::parse(path, e))
    }

    /// Split package pins into `main` and `dev` lists.
    pub fn partition(&self) -> LockedDependencies {
        let mut locked = LockedDependencies::default();
        for package in &self.package {
            let Some(requirement) = package.requirement() else {
                tracing::warn!(?package.name, "Skipping lock entry without name or version");
                continue;
            };
            match package.category() {
                Some(Category::Main) => locked.main.push(requirement),
                Some(Category::Dev) => locked.dev.push(requirement),
                None => {
                    tracing::debug!(%requirement, "Ignoring lock entry outside main/dev");
                }
            }
        }
        locked
    }
}

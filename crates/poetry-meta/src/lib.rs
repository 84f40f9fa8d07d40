//! Read-only model of Poetry projects.
//!
//! This crate loads the two files Poetry keeps at a project root and turns
//! them into data the tox plugin can consume:
//!
//! - [`manifest`] - `pyproject.toml` and its `[tool.poetry]` section
//! - [`lockfile`] - `poetry.lock` package pins, split by category
//! - [`source`] - `[[tool.poetry.source]]` package repositories
//! - [`dependency`] - the shapes a Poetry dependency declaration can take
//! - [`requirement`] - rendering of declarations as PEP 508 requirement strings

pub mod dependency;
pub mod error;
pub mod lockfile;
pub mod manifest;
pub mod requirement;
pub mod source;

/// Filename of the Poetry project manifest.
pub const MANIFEST_FILENAME: &str = "pyproject.toml";

/// Filename of the Poetry lock file.
pub const LOCK_FILENAME: &str = "poetry.lock";

pub use dependency::{DependencySpec, DetailedDependency};
pub use error::{Error, Result};
pub use lockfile::{Category, LockFile, LockedDependencies, LockedPackage};
pub use manifest::{NotApplicable, PoetryProject, ProjectLookup};
pub use requirement::{python_marker, to_pep_508, version_specifier};
pub use source::{SourceRepository, SourceRole};

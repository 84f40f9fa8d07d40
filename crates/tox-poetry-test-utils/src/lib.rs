//! Shared test utilities for the tox-poetry workspace.
//!
//! This crate provides temporary Poetry projects so that every crate's test
//! suite builds fixtures the same way. It is a dev-dependency only, never
//! published.
//!
//! # Modules
//!
//! - [`project`] - [`TestProject`] builder for a project directory
//! - [`content`] - snippets of manifest, lock and tox configuration

pub mod content;
pub mod project;

pub use project::TestProject;

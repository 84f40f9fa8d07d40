//! Package indexes derived from Poetry sources.
//!
//! pip knows one primary index and any number of extra ones. Poetry sources
//! are mapped onto that model:
//!
//! 1. the default source, or failing that the first regular source, becomes
//!    the primary index;
//! 2. the remaining regular sources follow as extra indexes, in order;
//! 3. PyPI is re-added once a custom primary has displaced it;
//! 4. secondary sources come last.

use poetry_meta::{SourceRepository, SourceRole};
use serde::Serialize;

use crate::error::{Error, Result};

pub const PYPI_NAME: &str = "pypi";
pub const PYPI_SIMPLE_URL: &str = "https://pypi.org/simple";

/// A named package index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexServer {
    pub name: String,
    pub url: String,
}

impl IndexServer {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The public index pip uses when nothing else is configured
    pub fn pypi() -> Self {
        Self::new(PYPI_NAME, PYPI_SIMPLE_URL)
    }
}

impl From<&SourceRepository> for IndexServer {
    fn from(source: &SourceRepository) -> Self {
        Self::new(&source.name, &source.url)
    }
}

/// Primary and extra indexes, in the order pip should consult them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexServers {
    pub primary: Option<IndexServer>,
    pub extras: Vec<IndexServer>,
}

impl IndexServers {
    /// Partition sources into primary and extra indexes.
    ///
    /// # Errors
    ///
    /// Returns `Error::MultipleDefaultSources` when more than one source is
    /// marked as the default.
    pub fn from_sources(sources: &[SourceRepository]) -> Result<Self> {
        let mut defaults = Vec::new();
        let mut normal = Vec::new();
        let mut secondary = Vec::new();

        for source in sources {
            match source.role() {
                SourceRole::Default => defaults.push(source),
                SourceRole::Normal => normal.push(IndexServer::from(source)),
                SourceRole::Secondary => secondary.push(IndexServer::from(source)),
                SourceRole::Explicit => {
                    tracing::debug!(source = %source.name, "Explicit source is not an index");
                }
            }
        }

        if defaults.len() > 1 {
            return Err(Error::MultipleDefaultSources {
                names: defaults.iter().map(|s| s.name.clone()).collect(),
            });
        }

        let primary = match defaults.first() {
            Some(default) => Some(IndexServer::from(*default)),
            None if !normal.is_empty() => Some(normal.remove(0)),
            None => None,
        };

        let mut extras = normal;
        if primary.is_some() {
            extras.push(IndexServer::pypi());
        }
        extras.extend(secondary);

        Ok(Self { primary, extras })
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.extras.is_empty()
    }

    /// Extra index URLs joined with spaces, or `None` when there are none
    pub fn extra_index_urls(&self) -> Option<String> {
        if self.extras.is_empty() {
            return None;
        }
        Some(
            self.extras
                .iter()
                .map(|s| s.url.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

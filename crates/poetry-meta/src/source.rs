//! Package source repositories declared as `[[tool.poetry.source]]`.

use serde::{Deserialize, Serialize};

/// Role a source repository plays when package indexes are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceRole {
    /// Replaces the public index as the primary index
    Default,
    /// Consulted after every other index
    Secondary,
    /// Regular index, in declared order
    Normal,
    /// Only used by packages that name it; never an index
    Explicit,
}

/// A single `[[tool.poetry.source]]` entry.
///
/// ```toml
/// [[tool.poetry.source]]
/// name = "internal"
/// url = "https://pypi.example.com/simple"
/// default = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceRepository {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub secondary: bool,
    /// Newer Poetry releases express the role as a priority string.
    #[serde(default)]
    pub priority: Option<String>,
}

impl SourceRepository {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            default: false,
            secondary: false,
            priority: None,
        }
    }

    /// Mark this repository as the default one
    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    /// Mark this repository as a secondary one
    pub fn as_secondary(mut self) -> Self {
        self.secondary = true;
        self
    }

    /// Classify the repository.
    ///
    /// The legacy `default`/`secondary` flags win over `priority`. Unknown
    /// priority values fall back to [`SourceRole::Normal`].
    pub fn role(&self) -> SourceRole {
        if self.default {
            return SourceRole::Default;
        }
        if self.secondary {
            return SourceRole::Secondary;
        }
        match self.priority.as_deref().map(str::trim) {
            Some("default") => SourceRole::Default,
            Some("secondary") | Some("supplemental") => SourceRole::Secondary,
            Some("explicit") => SourceRole::Explicit,
            Some("primary") | None => SourceRole::Normal,
            Some(other) => {
                tracing::warn!(
                    source = %self.name,
                    priority = other,
                    "Unknown source priority, treating as a regular index"
                );
                SourceRole::Normal
            }
        }
    }
}

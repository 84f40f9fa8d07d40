//! Shapes of a Poetry dependency declaration.
//!
//! Poetry accepts three forms for the value of a dependency key:
//!
//! ```toml
//! [tool.poetry.dev-dependencies]
//! pytest = "^7.0"                                        # constraint string
//! black = { version = "^23.1", python = "^3.8" }         # detailed table
//! numpy = [                                              # multiple constraints
//!     { version = "<1.25", python = "<3.9" },
//!     { version = "^1.25", python = ">=3.9" },
//! ]
//! ```

use serde::Deserialize;

/// One dependency declaration, as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Constraint(String),
    Detailed(DetailedDependency),
    Multiple(Vec<DetailedDependency>),
}

/// The table form of a dependency declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DetailedDependency {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub extras: Vec<String>,
    #[serde(default)]
    pub python: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub markers: Option<String>,
    #[serde(default)]
    pub optional: bool,

    // VCS source
    #[serde(default)]
    pub git: Option<String>,
    #[serde(default)]
    pub rev: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub subdirectory: Option<String>,

    // Local or remote archive
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl DetailedDependency {
    /// The git reference to check out, in Poetry's precedence order.
    pub fn git_reference(&self) -> Option<&str> {
        self.rev
            .as_deref()
            .or(self.tag.as_deref())
            .or(self.branch.as_deref())
    }
}

impl DependencySpec {
    /// Interpret a raw TOML value, returning `None` for shapes Poetry rejects.
    pub fn from_value(value: &toml::Value) -> Option<Self> {
        value.clone().try_into().ok()
    }

    /// View every alternative of this declaration as a detailed table.
    pub fn alternatives(&self) -> Vec<DetailedDependency> {
        match self {
            Self::Constraint(version) => vec![DetailedDependency {
                version: Some(version.clone()),
                ..Default::default()
            }],
            Self::Detailed(detail) => vec![detail.clone()],
            Self::Multiple(details) => details.clone(),
        }
    }
}

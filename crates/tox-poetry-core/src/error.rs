//! Error types for tox-poetry-core

use std::path::PathBuf;

use crate::config::OptionKind;

/// Result type for tox-poetry-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or creating environments
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// More than one Poetry source is marked as the default index
    #[error(
        "Can not have multiple default source repositories: {}",
        .names.join(", ")
    )]
    MultipleDefaultSources { names: Vec<String> },

    /// Neither tox.toml nor a [tool.tox] table was found
    #[error("No tox configuration found in {root}")]
    HostConfigNotFound { root: PathBuf },

    /// The tox configuration could not be parsed
    #[error("Failed to parse tox configuration at {path}: {message}")]
    HostConfigParse { path: PathBuf, message: String },

    /// An environment attribute has the wrong type
    #[error("Invalid value for '{attribute}' in environment '{env}': expected {expected}")]
    InvalidAttribute {
        env: String,
        attribute: String,
        expected: OptionKind,
    },

    /// An environment name that is not configured
    #[error("Unknown environment: {0}")]
    UnknownEnv(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Error from poetry-meta
    #[error(transparent)]
    Meta(#[from] poetry_meta::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

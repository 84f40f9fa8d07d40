//! Environment creation without a virtual environment
//!
//! An environment with `poetry_experimental_no_virtual_env` set does not get
//! a virtual environment. Its directory is reset and its interpreter path is
//! a symlink to the interpreter the host already resolved, so commands run
//! against the system installation.

use std::fs;
use std::io;
use std::path::Path;

use crate::config::{EnvConfig, HostConfig};
use crate::error::{Error, Result};
use crate::merge::PoetryToggles;
use crate::plugin::CreateOutcome;

/// Create `env` by linking `interpreter`, if the environment opted in.
///
/// Returns [`CreateOutcome::NotHandled`] without touching the filesystem for
/// non-test environments and environments that did not opt in.
pub fn create_env(config: &HostConfig, env: &EnvConfig, interpreter: &Path) -> Result<CreateOutcome> {
    if !config.is_test_env(&env.name) || !PoetryToggles::from_env(env).no_virtual_env {
        return Ok(CreateOutcome::NotHandled);
    }

    reset_env_dir(&env.env_dir)?;

    let link = env.env_python();
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    symlink(interpreter, &link).map_err(|e| Error::io(&link, e))?;

    tracing::info!(
        env = %env.name,
        link = %link.display(),
        target = %interpreter.display(),
        "Linked interpreter instead of creating a virtual environment"
    );
    Ok(CreateOutcome::Handled)
}

/// Remove whatever a previous run left in the environment directory
fn reset_env_dir(env_dir: &Path) -> Result<()> {
    match fs::symlink_metadata(env_dir) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(env_dir).map_err(|e| Error::io(env_dir, e))
        }
        Ok(_) => fs::remove_file(env_dir).map_err(|e| Error::io(env_dir, e)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(env_dir, e)),
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

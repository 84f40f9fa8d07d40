//! [`TestProject`] builder for tox-poetry test scenarios.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::content;

/// A temporary project directory with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use tox_poetry_test_utils::TestProject;
///
/// let project = TestProject::new()
///     .with_manifest("[tool.poetry]\nname = \"demo\"\n")
///     .with_lock("");
/// project.assert_file_exists("pyproject.toml");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a project whose manifest is a bare `[tool.poetry]` header
    /// followed by `body`.
    pub fn poetry(name: &str, body: &str) -> Self {
        Self::new().with_manifest(&format!("{}{}", content::poetry_header(name), body))
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `path` relative to the root, creating parents.
    ///
    /// # Panics
    /// Panics if the filesystem operations fail.
    pub fn write(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("TestProject::write: failed to create {parent:?}: {e}"));
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("TestProject::write: failed to write {full_path:?}: {e}"));
    }

    /// Write `pyproject.toml`.
    pub fn with_manifest(self, content: &str) -> Self {
        self.write("pyproject.toml", content);
        self
    }

    /// Write `poetry.lock`.
    pub fn with_lock(self, content: &str) -> Self {
        self.write("poetry.lock", content);
        self
    }

    /// Write `tox.toml`.
    pub fn with_tox(self, content: &str) -> Self {
        self.write("tox.toml", content);
        self
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) is a symlink pointing at
    /// `target`.
    ///
    /// # Panics
    /// Panics if the path is not a symlink or points elsewhere.
    pub fn assert_symlink_to(&self, path: &str, target: &Path) {
        let full_path = self.root().join(path);
        let actual = fs::read_link(&full_path)
            .unwrap_or_else(|e| panic!("Expected a symlink at {}: {e}", full_path.display()));
        assert_eq!(
            actual,
            target,
            "Symlink {} points to the wrong target",
            full_path.display()
        );
    }
}

//! Golden tests against the projects in test-fixtures/projects
//!
//! The configuration pass only reads from the project directory, so these
//! tests run directly on the checked-in fixtures.

use poetry_meta::{PoetryProject, ProjectLookup};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tox_poetry_core::merge::{PIP_EXTRA_INDEX_URL, PIP_INDEX_URL};
use tox_poetry_core::{
    ConfigureReport, HostConfig, IndexServers, OptionRegistry, Plugin, PoetryPlugin,
};

/// Path to a project under test-fixtures/projects.
fn fixture(name: &str) -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // tests/integration -> ../../test-fixtures
    manifest_dir.join("../../test-fixtures/projects").join(name)
}

fn configure(name: &str) -> (HostConfig, ConfigureReport) {
    let plugin = PoetryPlugin;
    let mut registry = OptionRegistry::new();
    plugin.add_options(&mut registry);

    let mut config = HostConfig::load(&fixture(name), &registry)
        .unwrap_or_else(|e| panic!("Failed to load tox configuration of {name}: {e}"));
    let report = plugin
        .configure(&mut config)
        .unwrap_or_else(|e| panic!("Configure failed for {name}: {e}"));
    (config, report)
}

fn load_project(name: &str) -> PoetryProject {
    match PoetryProject::load(&fixture(name)) {
        ProjectLookup::Found(project) => project,
        ProjectLookup::NotApplicable(reason) => panic!("{name} is not a Poetry project: {reason}"),
    }
}

// ==========================================================================
// grouped-sources: dependency groups, lock groups, every source kind
// ==========================================================================

#[test]
fn test_grouped_sources_partition() {
    let project = load_project("grouped-sources");
    let servers = IndexServers::from_sources(project.sources()).unwrap();

    assert_eq!(
        servers.primary.map(|s| s.name),
        Some("corp-mirror".to_string())
    );
    let extras: Vec<&str> = servers.extras.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(extras, vec!["team", "pypi", "nightly"]);
}

#[test]
fn test_grouped_sources_dev_env() {
    let (config, _) = configure("grouped-sources");
    let py311 = config.env("py311").unwrap();

    assert_eq!(
        py311.deps,
        vec![
            "coverage[toml]",
            "pytest>=7.2,<8.0",
            "pytest-asyncio>=0.21,<0.22",
            r#"respx>=0.20 ; python_version >= "3.9" and python_version < "4.0""#,
            "internal-fixtures @ git+https://git.example.com/qa/fixtures.git@v1.4.0",
        ]
    );
    assert_eq!(py311.set_env[PIP_INDEX_URL], "https://pypi.corp.example.com/simple");
    assert_eq!(
        py311.set_env[PIP_EXTRA_INDEX_URL],
        "https://team.corp.example.com/simple https://pypi.org/simple https://nightly.corp.example.com/simple"
    );
}

#[test]
fn test_grouped_sources_user_index_is_kept() {
    let (config, report) = configure("grouped-sources");
    let lint = config.env("lint").unwrap();

    assert_eq!(lint.deps, vec!["ruff"]);
    assert_eq!(lint.set_env[PIP_INDEX_URL], "https://lint-mirror.example.com/simple");
    assert_eq!(
        report.env("lint").unwrap().set_env,
        vec![(
            PIP_EXTRA_INDEX_URL.to_string(),
            "https://team.corp.example.com/simple https://pypi.org/simple https://nightly.corp.example.com/simple"
                .to_string()
        )]
    );
}

#[test]
fn test_grouped_sources_locked_env_uses_groups() {
    let (config, _) = configure("grouped-sources");

    assert_eq!(
        config.env("pinned").unwrap().deps,
        vec!["anyio==3.7.1", "httpx==0.24.1", "pytest==7.4.0"]
    );
}

#[test]
fn test_grouped_sources_non_test_envs_untouched() {
    let (config, report) = configure("grouped-sources");

    assert_eq!(config.env("docs").unwrap().deps, vec!["sphinx"]);
    assert!(config.env(".package").unwrap().deps.is_empty());
    assert!(report.env("docs").is_none());
    assert!(report.env(".package").is_none());
}

// ==========================================================================
// legacy-dev: dev-dependencies table, lock categories, [tool.tox]
// ==========================================================================

#[test]
fn test_legacy_dev_requirements() {
    let (config, _) = configure("legacy-dev");

    assert_eq!(
        config.env("py311").unwrap().deps,
        vec![
            "pytest>=7.0,<8.0",
            "black==23.1.0 ; platform_python_implementation == 'CPython'",
            "flake8",
        ]
    );
}

#[test]
fn test_legacy_locked_with_secondary_only_source() {
    let (config, _) = configure("legacy-dev");
    let py38 = config.env("py38").unwrap();

    assert_eq!(
        py38.deps,
        vec!["click==8.1.3", "colorama==0.4.6", "pytest==7.2.1"]
    );
    assert!(!py38.set_env.contains_key(PIP_INDEX_URL));
    assert_eq!(py38.set_env[PIP_EXTRA_INDEX_URL], "https://vendor.example.com/simple");
}

// ==========================================================================
// plain-setuptools: not a Poetry project
// ==========================================================================

#[test]
fn test_plain_project_is_skipped() {
    let (config, report) = configure("plain-setuptools");

    assert!(report.is_skipped());
    let py = config.env("py").unwrap();
    assert_eq!(py.deps, vec!["pytest"]);
    assert!(py.set_env.is_empty());
}

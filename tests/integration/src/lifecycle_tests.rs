//! Full plugin lifecycle: register options, load, configure, create
//!
//! Mirrors the order in which the host drives a plugin during one run.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tox_poetry_core::{
    CreateOutcome, Error, HostConfig, OptionRegistry, Plugin, PoetryPlugin,
};
use tox_poetry_test_utils::TestProject;
use tox_poetry_test_utils::content::{source_entry, tox_config};

/// Copy a fixture project into a fresh temporary directory.
fn copy_fixture(name: &str) -> TempDir {
    let source = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/projects")
        .join(name);
    let temp = TempDir::new().unwrap();
    for entry in fs::read_dir(&source).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), temp.path().join(entry.file_name())).unwrap();
    }
    temp
}

fn load(root: &Path, plugin: &PoetryPlugin) -> HostConfig {
    let mut registry = OptionRegistry::new();
    plugin.add_options(&mut registry);
    HostConfig::load(root, &registry).unwrap()
}

#[cfg(unix)]
#[test]
fn test_lifecycle_links_only_opted_in_env() {
    let project = copy_fixture("legacy-dev");
    let interpreter = project.path().join("python3.11");
    fs::write(&interpreter, "#!/bin/sh\n").unwrap();

    let plugin = PoetryPlugin;
    let mut config = load(project.path(), &plugin);
    plugin.configure(&mut config).unwrap();

    let mut outcomes = Vec::new();
    for name in config.test_env_names() {
        let env = config.env(&name).unwrap();
        outcomes.push((name.clone(), plugin.create_env(&config, env, &interpreter).unwrap()));
    }

    assert_eq!(
        outcomes,
        vec![
            ("py311".to_string(), CreateOutcome::Handled),
            ("py38".to_string(), CreateOutcome::NotHandled),
        ]
    );
    let py311 = config.env("py311").unwrap();
    assert_eq!(fs::read_link(py311.env_python()).unwrap(), interpreter);
    assert!(!config.env("py38").unwrap().env_dir.exists());
}

#[test]
fn test_lifecycle_configure_twice_doubles_entries() {
    let project = copy_fixture("legacy-dev");
    let plugin = PoetryPlugin;
    let mut config = load(project.path(), &plugin);

    plugin.configure(&mut config).unwrap();
    let once = config.env("py311").unwrap().deps.clone();
    plugin.configure(&mut config).unwrap();
    let twice = config.env("py311").unwrap().deps.clone();

    assert_eq!(twice.len(), once.len() * 2);
    assert_eq!(&twice[..once.len()], &twice[once.len()..]);
}

#[test]
fn test_lifecycle_aborts_on_multiple_default_sources() {
    let sources = [
        source_entry("corp", "https://corp.example/simple", "default"),
        source_entry("mirror", "https://mirror.example/simple", "default"),
    ]
    .concat();
    let project = TestProject::poetry("demo", &sources).with_tox(&tox_config(
        &["py"],
        &[("py", "poetry_use_source_repos = \"pip_env_vars\"")],
    ));
    let plugin = PoetryPlugin;
    let mut config = load(project.root(), &plugin);

    let err = plugin.configure(&mut config).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Can not have multiple default source repositories: corp, mirror"
    );
    assert!(matches!(err, Error::MultipleDefaultSources { .. }));
    assert!(config.env("py").unwrap().set_env.is_empty());
}

//! Tests for the configuration merge pass
//!
//! Each test builds a real project directory, loads the host configuration
//! through the plugin's registered options and runs the pass.

use pretty_assertions::assert_eq;
use tox_poetry_core::merge::{PIP_EXTRA_INDEX_URL, PIP_INDEX_URL};
use tox_poetry_core::{
    ConfigureReport, Error, HostConfig, OptionRegistry, Plugin, PoetryPlugin,
};
use tox_poetry_test_utils::TestProject;
use tox_poetry_test_utils::content::{lock_entry, source_entry, tox_config};

fn load_host(project: &TestProject) -> HostConfig {
    let mut registry = OptionRegistry::new();
    PoetryPlugin.add_options(&mut registry);
    HostConfig::load(project.root(), &registry).expect("tox configuration should load")
}

fn configure(project: &TestProject) -> (HostConfig, ConfigureReport) {
    let mut config = load_host(project);
    let report = PoetryPlugin
        .configure(&mut config)
        .expect("configure should succeed");
    (config, report)
}

const DEV_DEPS: &str = r#"
[tool.poetry.dev-dependencies]
pytest = "^7.2"
mypy = "*"
"#;

// =============================================================================
// Not a Poetry project
// =============================================================================

mod not_applicable_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_manifest_is_a_no_op() {
        let project = TestProject::new().with_tox(&tox_config(
            &["py"],
            &[("py", "deps = [\"six\"]\nadd_poetry_dev_dependencies = true")],
        ));
        let before = load_host(&project);

        let (after, report) = configure(&project);

        assert!(report.is_skipped());
        assert_eq!(after.envs, before.envs);
    }

    #[test]
    fn test_manifest_without_poetry_section_is_a_no_op() {
        let project = TestProject::new()
            .with_manifest("[project]\nname = \"plain\"\n")
            .with_tox(&tox_config(
                &["py"],
                &[(
                    "py",
                    "add_poetry_dev_dependencies = true\npoetry_use_source_repos = \"pip_env_vars\"",
                )],
            ));
        let before = load_host(&project);

        let (after, report) = configure(&project);

        assert!(report.is_skipped());
        assert_eq!(after.envs, before.envs);
    }
}

// =============================================================================
// Dependencies
// =============================================================================

mod dependency_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dev_dependencies_appended_to_opted_in_env_only() {
        let project = TestProject::poetry("demo", DEV_DEPS).with_tox(&tox_config(
            &["with", "without"],
            &[
                ("with", "deps = [\"coverage\"]\nadd_poetry_dev_dependencies = true"),
                ("without", "deps = [\"coverage\"]"),
            ],
        ));

        let (config, _) = configure(&project);

        assert_eq!(
            config.env("with").unwrap().deps,
            vec!["coverage", "pytest>=7.2,<8.0", "mypy"]
        );
        assert_eq!(config.env("without").unwrap().deps, vec!["coverage"]);
    }

    #[test]
    fn test_locked_main_then_dev_in_lock_order() {
        let lock = [
            lock_entry("p1", "1.0", "main"),
            lock_entry("p2", "2.0", "dev"),
        ]
        .concat();
        let project = TestProject::poetry("demo", DEV_DEPS)
            .with_lock(&lock)
            .with_tox(&tox_config(
                &["both", "locked-only"],
                &[
                    (
                        "both",
                        "add_poetry_dev_dependencies = true\npoetry_experimental_add_locked_dependencies = true",
                    ),
                    ("locked-only", "poetry_experimental_add_locked_dependencies = true"),
                ],
            ));

        let (config, _) = configure(&project);

        assert_eq!(config.env("both").unwrap().deps, vec!["p1==1.0", "p2==2.0"]);
        assert_eq!(config.env("locked-only").unwrap().deps, vec!["p1==1.0"]);
    }

    #[test]
    fn test_locked_mode_without_lock_file_adds_nothing() {
        let project = TestProject::poetry("demo", DEV_DEPS).with_tox(&tox_config(
            &["py"],
            &[(
                "py",
                "add_poetry_dev_dependencies = true\npoetry_experimental_add_locked_dependencies = true",
            )],
        ));

        let (config, _) = configure(&project);

        assert!(config.env("py").unwrap().deps.is_empty());
    }

    #[test]
    fn test_running_twice_appends_twice() {
        let project = TestProject::poetry("demo", DEV_DEPS).with_tox(&tox_config(
            &["py"],
            &[("py", "add_poetry_dev_dependencies = true")],
        ));
        let mut config = load_host(&project);

        PoetryPlugin.configure(&mut config).unwrap();
        PoetryPlugin.configure(&mut config).unwrap();

        assert_eq!(
            config.env("py").unwrap().deps,
            vec!["pytest>=7.2,<8.0", "mypy", "pytest>=7.2,<8.0", "mypy"]
        );
    }
}

// =============================================================================
// Environment selection
// =============================================================================

mod selection_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_internal_and_unlisted_envs_are_untouched() {
        let toggles = "add_poetry_dev_dependencies = true";
        let project = TestProject::poetry("demo", DEV_DEPS).with_tox(&tox_config(
            &["py", ".package", ".tox"],
            &[
                ("py", toggles),
                ("unlisted", toggles),
                ("\".package\"", toggles),
                ("\".tox\"", toggles),
            ],
        ));

        let (config, report) = configure(&project);

        assert_eq!(config.env("py").unwrap().deps.len(), 2);
        assert!(config.env("unlisted").unwrap().deps.is_empty());
        assert!(config.env(".package").unwrap().deps.is_empty());
        assert!(config.env(".tox").unwrap().deps.is_empty());
        assert!(report.env("unlisted").is_none());
        assert!(report.env("py").is_some());
    }
}

// =============================================================================
// Source repositories
// =============================================================================

mod source_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PIP_ENV_VARS: &str = "poetry_use_source_repos = \"pip_env_vars\"";

    #[test]
    fn test_pip_env_vars_follow_partition_order() {
        let sources = [
            source_entry("s1", "https://s1.example/simple", ""),
            source_entry("s2", "https://s2.example/simple", "secondary"),
            source_entry("s3", "https://s3.example/simple", ""),
        ]
        .concat();
        let project = TestProject::poetry("demo", &sources)
            .with_tox(&tox_config(&["py"], &[("py", PIP_ENV_VARS)]));

        let (config, _) = configure(&project);
        let env = config.env("py").unwrap();

        assert_eq!(env.set_env[PIP_INDEX_URL], "https://s1.example/simple");
        assert_eq!(
            env.set_env[PIP_EXTRA_INDEX_URL],
            "https://s3.example/simple https://pypi.org/simple https://s2.example/simple"
        );
    }

    #[test]
    fn test_user_defined_variables_win() {
        let sources = source_entry("corp", "https://corp.example/simple", "default");
        let body =
            format!("{PIP_ENV_VARS}\nset_env = {{ PIP_INDEX_URL = \"https://mine.example/simple\" }}");
        let project = TestProject::poetry("demo", &sources)
            .with_tox(&tox_config(&["py"], &[("py", body.as_str())]));

        let (config, _) = configure(&project);
        let env = config.env("py").unwrap();

        assert_eq!(env.set_env[PIP_INDEX_URL], "https://mine.example/simple");
        assert_eq!(env.set_env[PIP_EXTRA_INDEX_URL], "https://pypi.org/simple");
    }

    #[test]
    fn test_user_extra_index_is_kept() {
        let sources = [
            source_entry("corp", "https://corp.example/simple", "default"),
            source_entry("team", "https://team.example/simple", ""),
        ]
        .concat();
        let body = format!(
            "{PIP_ENV_VARS}\nset_env = {{ PIP_EXTRA_INDEX_URL = \"https://extra.example/simple\" }}"
        );
        let project = TestProject::poetry("demo", &sources)
            .with_tox(&tox_config(&["py"], &[("py", body.as_str())]));

        let (config, report) = configure(&project);
        let env = config.env("py").unwrap();

        assert_eq!(env.set_env[PIP_EXTRA_INDEX_URL], "https://extra.example/simple");
        assert_eq!(env.set_env[PIP_INDEX_URL], "https://corp.example/simple");
        assert_eq!(
            report.env("py").unwrap().set_env,
            vec![(PIP_INDEX_URL.to_string(), "https://corp.example/simple".to_string())]
        );
    }

    #[test]
    fn test_env_without_mode_gets_no_variables() {
        let sources = source_entry("corp", "https://corp.example/simple", "default");
        let project = TestProject::poetry("demo", &sources)
            .with_tox(&tox_config(&["py"], &[("py", "")]));

        let (config, _) = configure(&project);

        assert!(config.env("py").unwrap().set_env.is_empty());
    }

    #[test]
    fn test_two_default_sources_abort_the_pass() {
        let sources = [
            source_entry("a", "https://a.example/simple", "default"),
            source_entry("b", "https://b.example/simple", "default"),
        ]
        .concat();
        let body = format!("add_poetry_dev_dependencies = true\n{PIP_ENV_VARS}");
        let project = TestProject::poetry("demo", &format!("{DEV_DEPS}{sources}"))
            .with_tox(&tox_config(&["py"], &[("py", body.as_str())]));
        let mut config = load_host(&project);
        let before = config.envs.clone();

        let err = PoetryPlugin.configure(&mut config).unwrap_err();

        assert!(matches!(err, Error::MultipleDefaultSources { ref names } if names.len() == 2));
        assert_eq!(config.envs, before);
    }
}

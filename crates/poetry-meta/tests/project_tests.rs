//! Tests for loading Poetry projects from disk

use poetry_meta::{NotApplicable, PoetryProject, ProjectLookup, SourceRole};
use pretty_assertions::assert_eq;
use tox_poetry_test_utils::TestProject;
use tox_poetry_test_utils::content::{lock_entry, source_entry};

fn load(project: &TestProject) -> PoetryProject {
    match PoetryProject::load(project.root()) {
        ProjectLookup::Found(poetry) => poetry,
        ProjectLookup::NotApplicable(reason) => panic!("expected a Poetry project: {reason}"),
    }
}

mod lookup_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_directory_has_no_manifest() {
        let project = TestProject::new();
        let lookup = PoetryProject::load(project.root());
        assert!(matches!(
            lookup,
            ProjectLookup::NotApplicable(NotApplicable::ManifestMissing { .. })
        ));
    }

    #[test]
    fn test_setuptools_project_is_not_applicable() {
        let project = TestProject::new().with_manifest(
            r#"
[build-system]
requires = ["setuptools"]
build-backend = "setuptools.build_meta"
"#,
        );
        assert!(matches!(
            PoetryProject::load(project.root()),
            ProjectLookup::NotApplicable(NotApplicable::NoPoetrySection { .. })
        ));
    }

    #[test]
    fn test_poetry_project_is_found() {
        let project = TestProject::poetry("demo", "");
        let poetry = load(&project);
        assert_eq!(poetry.name(), Some("demo"));
        assert_eq!(poetry.root(), project.root());
    }
}

mod source_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sources_in_declared_order() {
        let body = [
            source_entry("one", "https://one/simple", ""),
            source_entry("two", "https://two/simple", "secondary"),
            source_entry("three", "https://three/simple", "supplemental"),
        ]
        .concat();
        let project = TestProject::poetry("demo", &body);
        let poetry = load(&project);

        let roles: Vec<(&str, SourceRole)> = poetry
            .sources()
            .iter()
            .map(|s| (s.name.as_str(), s.role()))
            .collect();
        assert_eq!(
            roles,
            vec![
                ("one", SourceRole::Normal),
                ("two", SourceRole::Secondary),
                ("three", SourceRole::Secondary),
            ]
        );
    }
}

mod lock_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_lock_file_is_empty() {
        let project = TestProject::poetry("demo", "");
        assert!(load(&project).locked_dependencies().is_empty());
    }

    #[test]
    fn test_malformed_lock_file_is_empty() {
        let project = TestProject::poetry("demo", "").with_lock("[[package]\n");
        assert!(load(&project).locked_dependencies().is_empty());
    }

    #[test]
    fn test_lock_file_is_partitioned() {
        let lock = [
            lock_entry("attrs", "22.2.0", "main"),
            lock_entry("pytest", "7.2.1", "dev"),
            lock_entry("iniconfig", "2.0.0", "dev"),
        ]
        .concat();
        let project = TestProject::poetry("demo", "").with_lock(&lock);
        let locked = load(&project).locked_dependencies();

        assert_eq!(locked.main, vec!["attrs==22.2.0"]);
        assert_eq!(locked.dev, vec!["pytest==7.2.1", "iniconfig==2.0.0"]);
    }
}

mod dev_dependency_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_path_dependency_is_a_file_url() {
        let project = TestProject::poetry(
            "demo",
            "\n[tool.poetry.dev-dependencies]\nhelper = { path = \"libs/helper\", develop = true }\n",
        );
        let requirements = load(&project).dev_requirements();

        assert_eq!(requirements.len(), 1);
        assert!(
            requirements[0].starts_with("helper @ file://"),
            "unexpected requirement: {}",
            requirements[0]
        );
        assert!(requirements[0].ends_with("libs/helper"));
    }

    #[test]
    fn test_oversized_version_passes_through() {
        let project = TestProject::poetry(
            "demo",
            "\n[tool.poetry.dev-dependencies]\nhuge = \"^18446744073709551615\"\npytest = \"^7.0\"\n",
        );

        assert_eq!(
            load(&project).dev_requirements(),
            vec!["huge^18446744073709551615", "pytest>=7.0,<8.0"]
        );
    }
}

//! Snippets of file content for building fixtures.

/// A minimal `[tool.poetry]` header for a project called `name`.
pub fn poetry_header(name: &str) -> String {
    format!("[tool.poetry]\nname = \"{name}\"\nversion = \"0.1.0\"\n")
}

/// A `[[tool.poetry.source]]` entry.
///
/// `role` is `""`, `"default"` or `"secondary"`; anything else is written as
/// a `priority` value.
pub fn source_entry(name: &str, url: &str, role: &str) -> String {
    let mut entry = format!("\n[[tool.poetry.source]]\nname = \"{name}\"\nurl = \"{url}\"\n");
    match role {
        "" => {}
        "default" => entry.push_str("default = true\n"),
        "secondary" => entry.push_str("secondary = true\n"),
        priority => entry.push_str(&format!("priority = \"{priority}\"\n")),
    }
    entry
}

/// A `[[package]]` lock entry.
pub fn lock_entry(name: &str, version: &str, category: &str) -> String {
    format!(
        "\n[[package]]\nname = \"{name}\"\nversion = \"{version}\"\ndescription = \"\"\ncategory = \"{category}\"\noptional = false\npython-versions = \"*\"\n"
    )
}

/// A `tox.toml` listing `env_list`, with one `[env.<name>]` table per entry
/// of `envs` holding the given raw TOML body.
pub fn tox_config(env_list: &[&str], envs: &[(&str, &str)]) -> String {
    let list = env_list
        .iter()
        .map(|e| format!("\"{e}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let mut config = format!("env_list = [{list}]\n");
    for (name, body) in envs {
        config.push_str(&format!("\n[env.{name}]\n{body}\n"));
    }
    config
}

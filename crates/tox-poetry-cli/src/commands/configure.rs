//! Configure command implementation

use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use tox_poetry_core::{ConfigureReport, EnvConfig, HostConfig, Plugin, PoetryPlugin};

use super::plugin_registry;
use crate::error::Result;

#[derive(Serialize)]
struct ConfigureOutput<'a> {
    applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped_reason: Option<String>,
    envs: &'a BTreeMap<String, EnvConfig>,
}

/// Run the configure command
pub fn run_configure(root: &Path, json: bool) -> Result<()> {
    let plugin = PoetryPlugin;
    let registry = plugin_registry(&plugin);
    let mut config = HostConfig::load(root, &registry)?;
    let report = plugin.configure(&mut config)?;

    if json {
        let output = ConfigureOutput {
            applied: !report.is_skipped(),
            skipped_reason: match &report {
                ConfigureReport::Skipped { reason } => Some(reason.to_string()),
                ConfigureReport::Applied { .. } => None,
            },
            envs: &config.envs,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let ConfigureReport::Skipped { reason } = &report {
        println!("{} {}", "Skipped:".yellow().bold(), reason);
        println!();
    }

    for (name, env) in &config.envs {
        print_env(&config, &report, name, env);
    }
    Ok(())
}

fn print_env(config: &HostConfig, report: &ConfigureReport, name: &str, env: &EnvConfig) {
    let label = if config.is_test_env(name) {
        name.cyan().bold()
    } else {
        format!("{name} (not a test environment)").dimmed()
    };
    println!("{label}");

    let added = report.env(name).map(|r| r.added_deps.len()).unwrap_or(0);
    let kept = env.deps.len() - added.min(env.deps.len());

    println!("  {}:", "deps".dimmed());
    if env.deps.is_empty() {
        println!("    {}", "None".dimmed());
    }
    for (i, dep) in env.deps.iter().enumerate() {
        if i < kept {
            println!("    {dep}");
        } else {
            println!("    {} {}", "+".green(), dep);
        }
    }

    println!("  {}:", "set_env".dimmed());
    if env.set_env.is_empty() {
        println!("    {}", "None".dimmed());
    }
    let set = report.env(name).map(|r| r.set_env.as_slice()).unwrap_or_default();
    for (key, value) in &env.set_env {
        if set.iter().any(|(k, _)| k == key) {
            println!("    {} {key}={value}", "+".green());
        } else {
            println!("    {key}={value}");
        }
    }
    println!();
}

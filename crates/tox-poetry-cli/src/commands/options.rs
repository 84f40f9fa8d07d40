//! Options command implementation

use colored::Colorize;
use tox_poetry_core::{OptionValue, PoetryPlugin};

use super::plugin_registry;
use crate::error::Result;

/// Run the options command
pub fn run_options(json: bool) -> Result<()> {
    let registry = plugin_registry(&PoetryPlugin);
    let options = registry.testenv_attributes();

    if json {
        println!("{}", serde_json::to_string_pretty(options)?);
        return Ok(());
    }

    println!("{}", "Environment options".bold());
    println!();
    for option in options {
        println!(
            "  {} ({}, default {})",
            option.name.cyan(),
            option.kind,
            display_default(&option.default).dimmed()
        );
        println!("      {}", option.help);
    }
    Ok(())
}

fn display_default(value: &OptionValue) -> String {
    match value {
        OptionValue::Bool(value) => value.to_string(),
        OptionValue::String(Some(value)) => format!("\"{value}\""),
        OptionValue::String(None) => "unset".to_string(),
    }
}

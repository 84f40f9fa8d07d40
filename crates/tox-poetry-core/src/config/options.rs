//! Per-environment options registered by plugins.
//!
//! The host only knows its own keys (`deps`, `set_env`, ...). Plugins add
//! theirs through [`OptionRegistry::add_testenv_attribute`], and the host
//! resolves every registered attribute when it loads an environment.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Value type of a registered attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Bool,
    String,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::String => write!(f, "string"),
        }
    }
}

/// Resolved value of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    String(Option<String>),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            Self::Bool(_) => OptionKind::Bool,
            Self::String(_) => OptionKind::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => value.as_deref(),
            Self::Bool(_) => None,
        }
    }
}

/// A registered per-environment attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionDefinition {
    pub name: String,
    pub kind: OptionKind,
    pub help: String,
    pub default: OptionValue,
}

/// Attributes registered by plugins, in registration order
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    testenv: Vec<OptionDefinition>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a per-environment attribute.
    ///
    /// Registering a name twice replaces the earlier definition.
    pub fn add_testenv_attribute(
        &mut self,
        name: &str,
        kind: OptionKind,
        help: &str,
        default: OptionValue,
    ) {
        debug_assert_eq!(kind, default.kind(), "default does not match kind for {name}");
        let definition = OptionDefinition {
            name: name.to_string(),
            kind,
            help: help.to_string(),
            default,
        };
        match self.testenv.iter_mut().find(|d| d.name == name) {
            Some(existing) => {
                tracing::debug!(attribute = name, "Replacing registered attribute");
                *existing = definition;
            }
            None => self.testenv.push(definition),
        }
    }

    pub fn testenv_attributes(&self) -> &[OptionDefinition] {
        &self.testenv
    }

    pub fn get(&self, name: &str) -> Option<&OptionDefinition> {
        self.testenv.iter().find(|d| d.name == name)
    }

    /// Resolve every registered attribute from an environment's table,
    /// falling back to defaults for missing keys.
    pub fn resolve(&self, env: &str, table: &toml::Table) -> Result<BTreeMap<String, OptionValue>> {
        let mut values = BTreeMap::new();
        for definition in &self.testenv {
            let value = match table.get(&definition.name) {
                None => definition.default.clone(),
                Some(raw) => parse_value(definition.kind, raw).ok_or_else(|| {
                    Error::InvalidAttribute {
                        env: env.to_string(),
                        attribute: definition.name.clone(),
                        expected: definition.kind,
                    }
                })?,
            };
            values.insert(definition.name.clone(), value);
        }
        Ok(values)
    }

    /// Defaults for every registered attribute
    pub fn defaults(&self) -> BTreeMap<String, OptionValue> {
        self.testenv
            .iter()
            .map(|d| (d.name.clone(), d.default.clone()))
            .collect()
    }
}

fn parse_value(kind: OptionKind, raw: &toml::Value) -> Option<OptionValue> {
    match kind {
        OptionKind::Bool => parse_bool(raw).map(OptionValue::Bool),
        OptionKind::String => raw
            .as_str()
            .map(|s| OptionValue::String(Some(s.trim().to_string()))),
    }
}

fn parse_bool(raw: &toml::Value) -> Option<bool> {
    if let Some(value) = raw.as_bool() {
        return Some(value);
    }
    match raw.as_str()?.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

//! Translation catalog
//!
//! Strings are looked up by dot-separated key paths such as
//! `projectForm.website.basic_info.company_name.label`. The English catalog is
//! compiled in; a JSON file with the same shape can override any subset of it.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::warn;

const EMBEDDED_EN: &str = include_str!("../locales/en.json");

/// Nested key → string tree
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    root: Value,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::embedded()
    }
}

impl Catalog {
    /// The built-in English catalog
    pub fn embedded() -> Self {
        match serde_json::from_str(EMBEDDED_EN) {
            Ok(root) => Self { root },
            Err(e) => {
                warn!("Embedded catalog is not valid JSON: {}", e);
                Self::empty()
            }
        }
    }

    pub fn empty() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json).context("Failed to parse catalog")?;
        Ok(Self { root })
    }

    /// Embedded catalog with the strings of `path` layered on top
    pub fn load_with_overrides(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let overrides = Self::from_json(&content)?;
        let mut catalog = Self::embedded();
        catalog.merge(overrides);
        Ok(catalog)
    }

    /// Deep-merge another catalog into this one; its strings win
    pub fn merge(&mut self, other: Catalog) {
        merge_values(&mut self.root, other.root);
    }

    /// String stored at a key path, if any
    pub fn lookup(&self, key: &str) -> Option<&str> {
        key.split('.')
            .try_fold(&self.root, |node, part| node.get(part))
            .and_then(Value::as_str)
    }

    /// Translate a key, falling back to the key itself
    pub fn t(&self, key: &str) -> String {
        self.lookup(key).unwrap_or(key).to_string()
    }

    /// Translate a key, falling back to a humanized form of `raw`
    pub fn t_or_humanize(&self, key: &str, raw: &str) -> String {
        self.lookup(key)
            .map(str::to_string)
            .unwrap_or_else(|| humanize(raw))
    }
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// `has_existing_website` → `Has existing website`
pub fn humanize(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! Per-repository settings.
//!
//! Defaults can be overridden by a `repomod.toml` at the repository root,
//! which in turn is overridden by command-line flags:
//!
//! ```toml
//! exclusions = [".git", "docs", "examples"]
//! remotes = ["upstream", "origin"]
//! main_branch = "main"
//! import_path = "sigs.k8s.io/kustomize"
//! ```

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use toml_edit::{DocumentMut, Item};

use crate::workspace::DEFAULT_EXCLUSIONS;

pub const CONFIG_FILE: &str = "repomod.toml";

/// Remotes tried, in order, when choosing where tags live.
pub const DEFAULT_REMOTES: &[&str] = &["upstream", "origin"];

pub const DEFAULT_MAIN_BRANCH: &str = "master";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub exclusions: Vec<String>,
    pub remotes: Vec<String>,
    pub main_branch: String,
    pub import_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
            remotes: DEFAULT_REMOTES.iter().map(|s| s.to_string()).collect(),
            main_branch: DEFAULT_MAIN_BRANCH.to_string(),
            import_path: None,
        }
    }
}

impl Settings {
    /// Defaults, overridden by `repomod.toml` in `repo_root` if there is one.
    pub fn load(repo_root: impl AsRef<Path>) -> Result<Self> {
        let path = repo_root.as_ref().join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::default()
            .merge_toml(&content)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Apply the keys present in a TOML document on top of `self`.
    pub fn merge_toml(mut self, content: &str) -> Result<Self> {
        let document: DocumentMut = content.parse().context("Failed to parse TOML")?;

        if let Some(item) = document.get("exclusions") {
            self.exclusions = string_array(item, "exclusions")?;
        }
        if let Some(item) = document.get("remotes") {
            self.remotes = string_array(item, "remotes")?;
        }
        if let Some(item) = document.get("main_branch") {
            self.main_branch = string_value(item, "main_branch")?;
        }
        if let Some(item) = document.get("import_path") {
            self.import_path = Some(string_value(item, "import_path")?);
        }

        Ok(self)
    }

    /// Extra names to skip on top of the configured ones; no repeats.
    pub fn add_exclusions<I, S>(&mut self, extra: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in extra {
            let name = name.into();
            if !self.exclusions.contains(&name) {
                self.exclusions.push(name);
            }
        }
    }
}

fn string_value(item: &Item, key: &str) -> Result<String> {
    item.as_str()
        .map(String::from)
        .ok_or_else(|| anyhow!("{} must be a string", key))
}

fn string_array(item: &Item, key: &str) -> Result<Vec<String>> {
    let array = item
        .as_array()
        .ok_or_else(|| anyhow!("{} must be an array of strings", key))?;
    array
        .iter()
        .map(|v| {
            v.as_str()
                .map(String::from)
                .ok_or_else(|| anyhow!("{} must be an array of strings", key))
        })
        .collect()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

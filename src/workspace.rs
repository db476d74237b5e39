//! Workspace scanning and module discovery.

use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::manifest::{GoMod, MANIFEST_FILE};
use crate::module::{strip_major_suffix, ModuleShortName};

/// Directory names skipped unless configured otherwise.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    ".git",
    ".github",
    ".idea",
    "docs",
    "examples",
    "hack",
    "site",
    "releasing",
];

/// A module as found on disk, before it is checked against the repository.
#[derive(Debug, Clone)]
pub struct ProtoModule {
    /// Directory of the go.mod file, relative to the repository root.
    pub rel_path: PathBuf,
    pub manifest: GoMod,
}

impl ProtoModule {
    /// Compute the module's short name and check that its declared path,
    /// the repository import path and its location on disk agree.
    pub fn short_name(&self, repo_import_path: &str) -> Result<ModuleShortName> {
        let declared = self.manifest.module_path.as_str();
        let file = self.manifest.path.display();

        let under_repo = declared
            .strip_prefix(repo_import_path)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
        if !under_repo {
            bail!(
                "module {:?} doesn't start with the repository name {:?}",
                declared,
                repo_import_path
            );
        }

        let unversioned = strip_major_suffix(declared);
        let short_name = if unversioned.len() <= repo_import_path.len() {
            ModuleShortName::top()
        } else {
            ModuleShortName::new(&unversioned[repo_import_path.len() + 1..])
        };

        if short_name.is_top() {
            if !self.rel_path.as_os_str().is_empty() {
                bail!(
                    "in {}, module {:?} names the repository root but lives in {}",
                    file,
                    declared,
                    self.rel_path.display()
                );
            }
        } else if self.rel_path.as_path() != Path::new(short_name.as_str()) {
            bail!(
                "in {}, the module name {:?} doesn't match the file's path {}",
                file,
                short_name.as_str(),
                self.rel_path.display()
            );
        }

        let expected = if short_name.is_top() {
            repo_import_path.to_string()
        } else {
            format!("{}/{}", repo_import_path, short_name.as_str())
        };
        if !declared.starts_with(&expected) {
            bail!("path invariant broken; {:?} != {:?}", expected, declared);
        }

        Ok(short_name)
    }
}

/// Scans a checkout for go.mod files.
#[derive(Debug)]
pub struct WorkspaceScanner {
    root: PathBuf,
    exclusions: BTreeSet<String>,
}

impl WorkspaceScanner {
    /// Create a new workspace scanner.
    pub fn new<I, S>(root: impl AsRef<Path>, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.as_ref().to_path_buf(),
            exclusions: exclusions.into_iter().map(Into::into).collect(),
        }
    }

    /// Walk the tree depth first, in file name order, collecting modules.
    ///
    /// Excluded directory names are never entered. A directory below the
    /// root that holds a go.mod is a module and is not searched for further
    /// modules. Any unreadable or unparsable go.mod aborts the scan.
    pub fn find_modules(&self) -> Result<Vec<ProtoModule>> {
        let mut modules = Vec::new();

        let mut walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !self
                        .exclusions
                        .contains(e.file_name().to_string_lossy().as_ref())
            });

        while let Some(entry) = walker.next() {
            let entry = entry.context("Failed to read directory entry")?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let manifest_path = entry.path().join(MANIFEST_FILE);
            if !manifest_path.is_file() {
                continue;
            }

            let manifest = GoMod::load(&manifest_path)?;
            let rel_path = entry
                .path()
                .strip_prefix(&self.root)
                .with_context(|| format!("{} is outside the workspace", entry.path().display()))?
                .to_path_buf();
            modules.push(ProtoModule { rel_path, manifest });

            if entry.depth() > 0 {
                walker.skip_current_dir();
            }
        }

        Ok(modules)
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;

//! The module registry: every module of one checkout, with versions.
//!
//! Built once per invocation and never updated. Edits made through the
//! [`Editor`] change files on disk only; they are seen on the next load.

use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::edit::Editor;
use crate::exec::Runner;
use crate::git::GitRunner;
use crate::module::{Module, ModuleShortName};
use crate::tags::TagResolver;
use crate::version::SemVer;
use crate::workspace::WorkspaceScanner;

/// Where and how to load a repository.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub root: PathBuf,
    pub import_path: String,
    pub remote: String,
    pub main_branch: String,
    pub exclusions: Vec<String>,
}

/// All modules of a checkout.
#[derive(Debug)]
pub struct Repository {
    root: PathBuf,
    import_path: String,
    remote: String,
    main_branch: String,
    modules: Vec<Module>,
}

/// One row of the module listing.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleRow {
    pub name: ModuleShortName,
    pub local: SemVer,
    pub remote: SemVer,
    pub dependencies: Vec<ModuleShortName>,
    /// Dependencies currently replaced by their in-repo directory.
    pub unpinned: Vec<ModuleShortName>,
}

impl Repository {
    /// Discover modules, validate them and attach their tagged versions.
    pub fn load(options: LoadOptions, git: &GitRunner<'_>) -> Result<Self> {
        let scanner = WorkspaceScanner::new(&options.root, options.exclusions.iter().cloned());
        let protos = scanner
            .find_modules()
            .with_context(|| format!("Failed to scan {}", options.root.display()))?;

        // Tags of renamed or deleted modules simply match nothing.
        let resolver = TagResolver::new(git);
        let local = resolver.load_local()?;
        let remote = resolver.load_remote(&options.remote)?;

        let mut modules = Vec::with_capacity(protos.len());
        for proto in protos {
            let short_name = proto.short_name(&options.import_path)?;
            if modules.iter().any(|m: &Module| m.short_name() == &short_name) {
                bail!("module {} is declared twice", short_name);
            }
            let version_local = local.latest(&short_name);
            let version_remote = remote.latest(&short_name);
            modules.push(Module::new(
                short_name,
                &options.import_path,
                &options.root,
                proto.manifest,
                version_local,
                version_remote,
            ));
        }

        Ok(Self {
            root: options.root,
            import_path: options.import_path,
            remote: options.remote,
            main_branch: options.main_branch,
            modules,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn main_branch(&self) -> &str {
        &self.main_branch
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn find_module(&self, name: &ModuleShortName) -> Option<&Module> {
        self.modules.iter().find(|m| m.short_name() == name)
    }

    /// Like [`Repository::find_module`], but a miss is an error.
    pub fn require_module(&self, name: &ModuleShortName) -> Result<&Module> {
        self.find_module(name).ok_or_else(|| {
            anyhow!(
                "cannot find module {:?} in repo {}",
                name.to_string(),
                self.import_path
            )
        })
    }

    /// Call `f` on every module in discovery order, stopping at the first error.
    pub fn apply<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&Module) -> Result<()>,
    {
        for module in &self.modules {
            f(module)?;
        }
        Ok(())
    }

    /// The version of `b` that `a` requires, if `a` depends on `b`.
    pub fn depends_on<'m>(&self, a: &'m Module, b: &Module) -> Option<&'m str> {
        a.depends_on(b)
    }

    /// Modules of this repository that `module` depends on.
    pub fn internal_dependencies(&self, module: &Module) -> Vec<&Module> {
        self.modules
            .iter()
            .filter(|other| module.depends_on(other).is_some())
            .collect()
    }

    pub fn len_longest_name(&self) -> usize {
        self.modules
            .iter()
            .map(|m| m.short_name().to_string().len())
            .max()
            .unwrap_or(0)
    }

    pub fn rows(&self) -> Vec<ModuleRow> {
        self.modules
            .iter()
            .map(|m| {
                let deps = self.internal_dependencies(m);
                ModuleRow {
                    name: m.short_name().clone(),
                    local: m.version_local(),
                    remote: m.version_remote(),
                    unpinned: deps
                        .iter()
                        .filter(|d| m.replaces_with_local(d))
                        .map(|d| d.short_name().clone())
                        .collect(),
                    dependencies: deps.iter().map(|d| d.short_name().clone()).collect(),
                }
            })
            .collect()
    }

    /// Render the module table.
    pub fn list_table(&self) -> String {
        let width = self.len_longest_name() + 2;
        let mut output = format!(
            "{:<width$}{:<11}{:<11}{}\n",
            "NAME",
            "LOCAL",
            "REMOTE",
            "INTRA-REPO-DEPENDENCIES",
            width = width
        );
        for row in self.rows() {
            let deps: Vec<String> = row.dependencies.iter().map(|d| d.to_string()).collect();
            output.push_str(&format!(
                "{:<width$}{:<11}{:<11}{}\n",
                row.name.to_string(),
                row.local.to_string(),
                row.remote.to_string(),
                deps.join(", "),
                width = width
            ));
        }
        output
    }

    /// Print the listing header and table.
    pub fn print_list(&self) {
        println!("{} {}", "  repo path:".cyan(), self.root.display());
        println!("{} {}", "import path:".cyan(), self.import_path);
        println!("{} {}\n", "     remote:".cyan(), self.remote);
        print!("{}", self.list_table());
    }

    pub fn list_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.rows()).context("Failed to serialize module list")
    }

    /// Run `go mod tidy` in every module.
    pub fn tidy(&self, runner: &dyn Runner, dry_run: bool) -> Result<()> {
        self.apply(|m| Editor::new(m, runner, dry_run).tidy())
    }

    /// Make every module that depends on `target` require `version` of it,
    /// dropping any local replacement.
    pub fn pin(
        &self,
        target: &Module,
        version: SemVer,
        runner: &dyn Runner,
        dry_run: bool,
    ) -> Result<()> {
        self.apply(|m| match m.depends_on(target) {
            Some(old_version) => Editor::new(m, runner, dry_run).pin(target, old_version, version),
            None => Ok(()),
        })
    }

    /// Make every module that depends on `target` use its in-repo copy.
    pub fn unpin(&self, target: &Module, runner: &dyn Runner, dry_run: bool) -> Result<()> {
        self.apply(|m| match m.depends_on(target) {
            Some(old_version) => Editor::new(m, runner, dry_run).unpin(
                m.short_name().depth(),
                target,
                old_version,
            ),
            None => Ok(()),
        })
    }
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;

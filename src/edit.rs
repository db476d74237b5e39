//! go.mod rewriting for local development and releases.
//!
//! Unpinning points a dependency on an in-repo module at its directory via a
//! `replace` directive; pinning drops that replacement and requires a
//! released version again. All edits go through `go mod`, run in the
//! module's directory.

use anyhow::{Context, Result};

use crate::exec::{Invocation, Runner};
use crate::module::Module;
use crate::version::SemVer;

/// Runs `go mod` commands against one module.
pub struct Editor<'a> {
    module: &'a Module,
    runner: &'a dyn Runner,
    dry_run: bool,
}

impl<'a> Editor<'a> {
    pub fn new(module: &'a Module, runner: &'a dyn Runner, dry_run: bool) -> Self {
        Self {
            module,
            runner,
            dry_run,
        }
    }

    fn run(&self, args: &[String]) -> Result<()> {
        let mut full = vec!["mod".to_string()];
        full.extend_from_slice(args);
        let invocation = Invocation::new("go", full, self.module.abs_path());
        self.runner
            .run(&invocation, self.dry_run)
            .with_context(|| format!("Failed to edit module {}", self.module.short_name()))?;
        Ok(())
    }

    pub fn tidy(&self) -> Result<()> {
        self.run(&["tidy".to_string()])
    }

    pub fn pin(&self, target: &Module, old_version: &str, new_version: SemVer) -> Result<()> {
        let path = target.module_path();
        self.run(&[
            "edit".to_string(),
            format!("-dropreplace={}@{}", path, old_version),
            format!("-require={}@{}", path, new_version),
        ])
    }

    /// Replace the requirement on `target` with a relative path climbing
    /// `depth` directories from this module.
    pub fn unpin(&self, depth: usize, target: &Module, old_version: &str) -> Result<()> {
        self.run(&[
            "edit".to_string(),
            format!(
                "-replace={}@{}={}",
                target.module_path(),
                old_version,
                relative_path(depth, target.short_name().as_str())
            ),
        ])
    }
}

/// `depth` repetitions of `../` followed by `short_name`.
///
/// At depth 0 the result is anchored with `./`, since go.mod only treats
/// paths starting with `./` or `../` as local directories.
pub fn relative_path(depth: usize, short_name: &str) -> String {
    if depth == 0 {
        return format!("./{}", short_name);
    }
    format!("{}{}", "../".repeat(depth), short_name)
}

#[cfg(test)]
#[path = "edit_tests.rs"]
mod tests;

//! Git operations used by version resolution and releasing.
//!
//! Read-only queries always run, even in a dry run, because later steps
//! depend on their answers. Anything that changes the checkout or the
//! remote honours the dry-run flag.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::exec::{Invocation, Runner};

pub const REFS_TAGS: &str = "refs/tags/";

/// Issues git commands in one working directory.
pub struct GitRunner<'a> {
    runner: &'a dyn Runner,
    work_dir: PathBuf,
    dry_run: bool,
}

impl<'a> GitRunner<'a> {
    pub fn new(runner: &'a dyn Runner, work_dir: impl AsRef<Path>, dry_run: bool) -> Self {
        Self {
            runner,
            work_dir: work_dir.as_ref().to_path_buf(),
            dry_run,
        }
    }

    fn query(&self, args: &[&str]) -> Result<String> {
        self.runner
            .run(&Invocation::new("git", args.iter().copied(), &self.work_dir), false)
    }

    fn mutate(&self, args: &[&str]) -> Result<()> {
        self.runner.run(
            &Invocation::new("git", args.iter().copied(), &self.work_dir),
            self.dry_run,
        )?;
        Ok(())
    }

    /// Names of the configured remotes.
    pub fn remotes(&self) -> Result<Vec<String>> {
        Ok(non_empty_lines(&self.query(&["remote"])?))
    }

    /// Pick the first remote from `preferred` that is configured.
    pub fn determine_remote(&self, preferred: &[String]) -> Result<String> {
        let remotes = self.remotes()?;
        if remotes.is_empty() {
            bail!("need at least one remote");
        }
        preferred
            .iter()
            .find(|name| remotes.contains(*name))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unable to find recognized remote {:?}", preferred))
    }

    pub fn local_tags(&self) -> Result<Vec<String>> {
        Ok(non_empty_lines(&self.query(&["tag", "-l"])?))
    }

    /// Tag names on the remote, with the `refs/tags/` prefix removed.
    pub fn remote_tags(&self, remote: &str) -> Result<Vec<String>> {
        let out = self.query(&["ls-remote", "--refs", remote])?;
        Ok(out
            .lines()
            .filter_map(|line| line.split_whitespace().nth(1))
            .filter_map(|reference| reference.strip_prefix(REFS_TAGS))
            .map(String::from)
            .collect())
    }

    pub fn assure_clean_workspace(&self) -> Result<()> {
        let out = self.query(&["status", "--porcelain"])?;
        if !out.trim().is_empty() {
            bail!("the workspace isn't clean:\n{}", out.trim_end());
        }
        Ok(())
    }

    pub fn fetch_remote(&self, remote: &str) -> Result<()> {
        self.mutate(&["fetch", remote])
    }

    pub fn checkout_branch(&self, branch: &str) -> Result<()> {
        self.mutate(&["checkout", branch])
    }

    /// Fast-forward only merge from `{remote}/{branch}`.
    pub fn merge_ff_only(&self, remote: &str, branch: &str) -> Result<()> {
        self.mutate(&["merge", "--ff-only", &format!("{}/{}", remote, branch)])
    }

    pub fn does_remote_branch_exist(&self, remote: &str, branch: &str) -> Result<bool> {
        let look_for = format!("{}/{}", remote, branch);
        let out = self.query(&["branch", "-r"])?;
        Ok(out.lines().any(|line| line.trim() == look_for))
    }

    pub fn does_local_branch_exist(&self, branch: &str) -> Result<bool> {
        let out = self.query(&["branch", "--list", branch])?;
        Ok(out
            .lines()
            .map(|line| line.trim_start_matches(['*', '+']).trim())
            .any(|name| name == branch))
    }

    /// Check out a release branch, creating it locally if neither the remote
    /// nor an earlier interrupted run has it yet.
    pub fn checkout_release_branch(&self, remote: &str, branch: &str) -> Result<()> {
        if self.does_remote_branch_exist(remote, branch)? {
            // git creates the local tracking branch if only the remote one exists
            return self.checkout_branch(branch);
        }
        if self.does_local_branch_exist(branch)? {
            log::info!("reusing local branch {} that was never pushed", branch);
            return self.checkout_branch(branch);
        }
        self.mutate(&["checkout", "-b", branch])
    }

    pub fn push_branch_force(&self, remote: &str, branch: &str) -> Result<()> {
        self.mutate(&["push", "-f", remote, branch])
    }

    pub fn create_local_release_tag(&self, tag: &str, branch: &str) -> Result<()> {
        let message = format!("Release {} on branch {}", tag, branch);
        self.mutate(&["tag", "-a", tag, "-m", &message])
    }

    pub fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.mutate(&["push", remote, tag])
    }

    pub fn delete_local_tag(&self, tag: &str) -> Result<()> {
        self.mutate(&["tag", "--delete", tag])
    }

    pub fn delete_remote_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.mutate(&["push", remote, &format!(":{}{}", REFS_TAGS, tag)])
    }
}

fn non_empty_lines(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;

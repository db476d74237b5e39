//! Releasing and un-releasing a single module.
//!
//! A release moves the main branch up to the remote, brings the module's
//! release branch (one per minor line) up to main, pushes it and tags it.
//! Steps run in order and the first failure stops the sequence. Nothing
//! already done is undone: a failure after the branch push leaves that
//! branch on the remote.

use anyhow::{bail, Result};
use colored::Colorize;

use crate::git::GitRunner;
use crate::module::Module;
use crate::tags::tag_for;
use crate::version::{BumpType, SemVer};

/// Release branch and tag names for `version` of `module`.
///
/// `release-1.2` and `v1.2.3` for the root module,
/// `release-kyaml-1.2` and `kyaml/v1.2.3` otherwise.
pub fn branch_and_tag(module: &Module, version: SemVer) -> (String, String) {
    let name = module.short_name();
    let branch = if name.is_top() {
        format!("release-{}", version.branch_label())
    } else {
        format!("release-{}-{}", name.as_str(), version.branch_label())
    };
    (branch, tag_for(name, version))
}

/// Sequences the git steps of a release.
pub struct Releaser<'g, 'r> {
    git: &'g GitRunner<'r>,
    remote: String,
    main_branch: String,
}

impl<'g, 'r> Releaser<'g, 'r> {
    pub fn new(git: &'g GitRunner<'r>, remote: &str, main_branch: &str) -> Self {
        Self {
            git,
            remote: remote.to_string(),
            main_branch: main_branch.to_string(),
        }
    }

    /// The version a release of `target` with `bump` would produce, checked
    /// against what the remote already has.
    pub fn next_version(&self, target: &Module, bump: BumpType) -> Result<SemVer> {
        let new_version = target.version_local().bump(bump);
        let remote_version = target.version_remote();

        if new_version == remote_version {
            bail!(
                "version {} already exists on remote - delete it first",
                new_version
            );
        }
        if new_version < remote_version {
            log::warn!(
                "version {} is less than the most recent remote version ({})",
                new_version,
                remote_version
            );
        }
        Ok(new_version)
    }

    /// Tag and push a new version of `target`. Returns the new version.
    pub fn release(&self, target: &Module, bump: BumpType) -> Result<SemVer> {
        let new_version = self.next_version(target, bump)?;
        let (branch, tag) = branch_and_tag(target, new_version);
        let remote = self.remote.as_str();
        let main = self.main_branch.as_str();

        println!(
            "{} {}, stepping from {} to {}",
            "Releasing".green().bold(),
            target.short_name(),
            target.version_local(),
            new_version
        );

        self.git.assure_clean_workspace()?;
        self.git.fetch_remote(remote)?;
        self.git.checkout_branch(main)?;
        self.git.merge_ff_only(remote, main)?;
        self.git.assure_clean_workspace()?;
        self.git.checkout_release_branch(remote, &branch)?;
        self.git.merge_ff_only(remote, main)?;
        self.git.push_branch_force(remote, &branch)?;
        self.git.create_local_release_tag(&tag, &branch)?;
        self.git.push_tag(remote, &tag)?;
        self.git.checkout_branch(main)?;

        println!("{} {} on branch {}", "✓".green().bold(), tag, branch);
        Ok(new_version)
    }

    /// Delete the newest remote tag of `target`, remotely and then locally.
    pub fn unrelease(&self, target: &Module) -> Result<String> {
        let version = target.version_remote();
        if version.is_zero() {
            bail!("module {} has no release on {}", target.short_name(), self.remote);
        }
        let tag = tag_for(target.short_name(), version);

        println!("{} {}", "Unreleasing".yellow().bold(), tag);

        self.git.delete_remote_tag(&self.remote, &tag)?;
        self.git.delete_local_tag(&tag)?;
        Ok(tag)
    }
}

#[cfg(test)]
#[path = "release_tests.rs"]
mod tests;

//! Module versions recovered from git tags.
//!
//! A release tag is `{shortName}/v1.2.3`, or a bare `v1.2.3` for the root
//! module. Tags that don't fit that shape belong to unrelated history and
//! are dropped without complaint.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::git::GitRunner;
use crate::module::ModuleShortName;
use crate::version::SemVer;

/// Short name to known versions, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionMap(BTreeMap<ModuleShortName, Vec<SemVer>>);

impl VersionMap {
    /// Build a map from raw tag names.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map: BTreeMap<ModuleShortName, Vec<SemVer>> = BTreeMap::new();
        for tag in tags {
            match parse_tag(tag.as_ref()) {
                Some((name, version)) => map.entry(name).or_default().push(version),
                None => log::trace!("ignoring tag {:?}", tag.as_ref()),
            }
        }
        for versions in map.values_mut() {
            versions.sort_unstable_by(|a, b| b.cmp(a));
            versions.dedup();
        }
        Self(map)
    }

    /// All versions of a module, newest first.
    pub fn versions(&self, name: &ModuleShortName) -> &[SemVer] {
        self.0.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Newest version of a module, or [`SemVer::ZERO`] if it was never tagged.
    pub fn latest(&self, name: &ModuleShortName) -> SemVer {
        self.versions(name).first().copied().unwrap_or(SemVer::ZERO)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Split a tag into module short name and version.
pub fn parse_tag(tag: &str) -> Option<(ModuleShortName, SemVer)> {
    let tag = tag.trim();
    let (prefix, raw_version) = match tag.rsplit_once('/') {
        Some((prefix, raw_version)) => (prefix, raw_version),
        None => ("", tag),
    };
    let version = SemVer::parse(raw_version).ok()?;
    Some((ModuleShortName::new(prefix), version))
}

/// The tag naming `version` of module `name`.
pub fn tag_for(name: &ModuleShortName, version: SemVer) -> String {
    if name.is_top() {
        version.to_string()
    } else {
        format!("{}/{}", name.as_str(), version)
    }
}

/// Loads local and remote tags through git.
pub struct TagResolver<'g, 'r> {
    git: &'g GitRunner<'r>,
}

impl<'g, 'r> TagResolver<'g, 'r> {
    pub fn new(git: &'g GitRunner<'r>) -> Self {
        Self { git }
    }

    pub fn load_local(&self) -> Result<VersionMap> {
        Ok(VersionMap::from_tags(self.git.local_tags()?))
    }

    pub fn load_remote(&self, remote: &str) -> Result<VersionMap> {
        Ok(VersionMap::from_tags(self.git.remote_tags(remote)?))
    }
}

#[cfg(test)]
#[path = "tags_tests.rs"]
mod tests;

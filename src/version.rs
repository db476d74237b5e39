//! Semantic versions as they appear in module tags.

use anyhow::{bail, Context, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Type of version bump to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpType {
    Major,
    Minor,
    Patch,
}

impl FromStr for BumpType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            _ => bail!("unknown bump type {:?}, expected major, minor or patch", s),
        }
    }
}

/// A `v{major}.{minor}.{patch}` version.
///
/// Equality and ordering only ever look at the numeric triple, compared
/// major first. A module with no tags at all carries [`SemVer::ZERO`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemVer {
    pub const ZERO: SemVer = SemVer::new(0, 0, 0);

    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version of the form `v1.2.3`.
    ///
    /// Pre-release and build suffixes are rejected; tags carrying them are
    /// not release tags as far as this tool is concerned.
    pub fn parse(raw: &str) -> Result<Self> {
        let Some(numbers) = raw.strip_prefix('v') else {
            bail!("{:?} must start with v", raw);
        };
        let parsed = semver::Version::parse(numbers)
            .with_context(|| format!("{:?} doesn't have the form v1.2.3", raw))?;
        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            bail!("{:?} has a pre-release or build suffix", raw);
        }
        Ok(Self::new(parsed.major, parsed.minor, parsed.patch))
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn bump(&self, bump_type: BumpType) -> Self {
        match bump_type {
            BumpType::Major => Self::new(self.major + 1, 0, 0),
            BumpType::Minor => Self::new(self.major, self.minor + 1, 0),
            BumpType::Patch => Self::new(self.major, self.minor, self.patch + 1),
        }
    }

    /// The `major.minor` label used in release branch names.
    pub fn branch_label(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SemVer {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for SemVer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;

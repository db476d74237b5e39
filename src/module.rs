//! Modules and their in-repository names.

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::manifest::GoMod;
use crate::version::SemVer;

/// How the root module is shown to (and accepted from) users.
pub const TOP_MODULE_LABEL: &str = "{top}";

/// The path from the repository root to a module's go.mod directory,
/// e.g. `""`, `kyaml`, `cmd/config`.
///
/// It is the module's unique key within a repository and, for every module
/// but the root one, the prefix of its release tags.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ModuleShortName(String);

impl ModuleShortName {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into().trim_matches('/').to_string())
    }

    pub fn top() -> Self {
        Self(String::new())
    }

    /// Parse a user-supplied name; `{top}`, `.` and `""` mean the root module.
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            TOP_MODULE_LABEL | "." | "" => Self::top(),
            other => Self::new(other.trim_start_matches("./")),
        }
    }

    pub fn is_top(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of path segments; the root module has depth 0.
    pub fn depth(&self) -> usize {
        if self.is_top() {
            0
        } else {
            self.0.split('/').count()
        }
    }
}

impl fmt::Display for ModuleShortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top() {
            f.write_str(TOP_MODULE_LABEL)
        } else {
            f.write_str(&self.0)
        }
    }
}

impl Serialize for ModuleShortName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Strip a trailing major-version element such as `/v2` from a module path.
pub fn strip_major_suffix(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((head, last))
            if last.len() > 1
                && last.starts_with('v')
                && last[1..].bytes().all(|b| b.is_ascii_digit()) =>
        {
            head
        }
        _ => path,
    }
}

/// A Go module found in the repository.
#[derive(Debug, Clone)]
pub struct Module {
    short_name: ModuleShortName,
    import_path: String,
    abs_path: PathBuf,
    manifest: GoMod,
    version_local: SemVer,
    version_remote: SemVer,
}

impl Module {
    pub fn new(
        short_name: ModuleShortName,
        repo_import_path: &str,
        repo_root: &Path,
        manifest: GoMod,
        version_local: SemVer,
        version_remote: SemVer,
    ) -> Self {
        let (import_path, abs_path) = if short_name.is_top() {
            (repo_import_path.to_string(), repo_root.to_path_buf())
        } else {
            (
                format!("{}/{}", repo_import_path, short_name.as_str()),
                repo_root.join(short_name.as_str()),
            )
        };
        Self {
            short_name,
            import_path,
            abs_path,
            manifest,
            version_local,
            version_remote,
        }
    }

    pub fn short_name(&self) -> &ModuleShortName {
        &self.short_name
    }

    /// Repository import path joined with the short name, without any
    /// major-version suffix.
    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    /// The path declared by the module statement, e.g. `.../kyaml/v2`.
    pub fn module_path(&self) -> &str {
        &self.manifest.module_path
    }

    pub fn abs_path(&self) -> &Path {
        &self.abs_path
    }

    pub fn manifest(&self) -> &GoMod {
        &self.manifest
    }

    /// Highest local tag, or [`SemVer::ZERO`].
    pub fn version_local(&self) -> SemVer {
        self.version_local
    }

    /// Highest tag on the remote, or [`SemVer::ZERO`].
    pub fn version_remote(&self) -> SemVer {
        self.version_remote
    }

    /// The version of `target` this module currently requires, if any.
    pub fn depends_on(&self, target: &Module) -> Option<&str> {
        self.manifest
            .requires
            .iter()
            .find(|r| strip_major_suffix(&r.path) == target.import_path())
            .map(|r| r.version.as_str())
    }

    /// Whether this module's go.mod replaces `target` with a directory,
    /// i.e. `target` is currently unpinned here.
    pub fn replaces_with_local(&self, target: &Module) -> bool {
        self.manifest.replaces.iter().any(|r| {
            strip_major_suffix(&r.old_path) == target.import_path()
                && (r.new_path.starts_with("./") || r.new_path.starts_with("../"))
        })
    }
}

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;

//! Locating the git checkout and its Go import path.

use anyhow::{anyhow, bail, Context, Result};
use std::path::{Path, PathBuf};

/// Marks the GOPATH-style layout `{gopath}/src/{import path}`.
const SRC_HINT: &str = "/src/";

/// The working tree of a git repository.
pub struct Checkout {
    root: PathBuf,
    repo: git2::Repository,
}

impl Checkout {
    /// Find the checkout containing `path`.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let repo = git2::Repository::discover(path)
            .with_context(|| format!("{} is not inside a git repository", path.display()))?;
        let root = repo
            .workdir()
            .ok_or_else(|| anyhow!("{} is a bare repository", repo.path().display()))?
            .to_path_buf();
        let root = root.canonicalize().unwrap_or(root);
        Ok(Self { root, repo })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL of a configured remote.
    pub fn remote_url(&self, remote: &str) -> Result<String> {
        let found = self
            .repo
            .find_remote(remote)
            .with_context(|| format!("No remote named {:?}", remote))?;
        found
            .url()
            .map(String::from)
            .ok_or_else(|| anyhow!("Remote {:?} has no usable URL", remote))
    }

    /// The repository's import path.
    ///
    /// Taken from the GOPATH layout of the checkout when there is one,
    /// otherwise from the URL of `remote`. A plain `~/src/widgets` clone is
    /// not a GOPATH layout.
    pub fn import_path(&self, remote: &str) -> Result<String> {
        if let Some(path) = import_path_from_dir(&self.root).filter(|p| has_domain(p)) {
            return Ok(path);
        }
        let url = self.remote_url(remote)?;
        import_path_from_url(&url)
            .ok_or_else(|| anyhow!("Cannot derive an import path from remote URL {:?}", url))
    }
}

/// `/home/me/go/src/github.com/acme/widgets` -> `github.com/acme/widgets`.
pub fn import_path_from_dir(dir: &Path) -> Option<String> {
    let dir = dir.to_string_lossy().replace('\\', "/");
    let index = dir.rfind(SRC_HINT)?;
    let path = dir[index + SRC_HINT.len()..].trim_end_matches('/');
    (!path.is_empty()).then(|| path.to_string())
}

/// Remote import paths start with a host name: `github.com/...`.
fn has_domain(import_path: &str) -> bool {
    import_path
        .split('/')
        .next()
        .is_some_and(|first| first.contains('.'))
}

/// Turn a clone URL into an import path.
///
/// Handles `https://host/org/repo.git`, `ssh://git@host/org/repo` and the
/// scp-like `git@host:org/repo.git`.
pub fn import_path_from_url(url: &str) -> Option<String> {
    let url = url.trim();
    let rest = match url.split_once("://") {
        Some((_, rest)) => rest.to_string(),
        None => {
            let (host, path) = url.split_once(':')?;
            format!("{}/{}", host, path)
        }
    };
    let rest = match rest.split_once('@') {
        Some((user, host_and_path)) if !user.contains('/') => host_and_path,
        _ => rest.as_str(),
    };
    let (host, path) = rest.split_once('/')?;
    let host = host.split(':').next()?;
    let path = path.trim_matches('/').trim_end_matches(".git");
    if host.is_empty() || path.is_empty() {
        return None;
    }
    Some(format!("{}/{}", host, path))
}

/// Fail unless `path` looks like an import path.
pub fn check_import_path(path: &str) -> Result<()> {
    if path.is_empty() || path.starts_with('/') || path.ends_with('/') || path.contains("//") {
        bail!("{:?} is not a valid import path", path);
    }
    Ok(())
}

#[cfg(test)]
#[path = "checkout_tests.rs"]
mod tests;

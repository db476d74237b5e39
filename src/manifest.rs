//! go.mod file parsing.
//!
//! Only what the repository tooling needs is kept: the declared module
//! path, the requirement list and the replace directives. Other directives
//! (`go`, `toolchain`, `exclude`, `retract`, ...) are accepted and skipped.

use anyhow::{anyhow, bail, Context, Result};
use std::path::{Path, PathBuf};

/// Name of the manifest file that marks a module directory.
pub const MANIFEST_FILE: &str = "go.mod";

/// A parsed go.mod file.
#[derive(Debug, Clone)]
pub struct GoMod {
    pub path: PathBuf,
    pub module_path: String,
    pub requires: Vec<Requirement>,
    pub replaces: Vec<Replacement>,
}

/// One `require` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub path: String,
    pub version: String,
}

/// One `replace` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub old_path: String,
    pub old_version: Option<String>,
    pub new_path: String,
    pub new_version: Option<String>,
}

impl GoMod {
    /// Load a go.mod file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(path, &content)
    }

    /// Parse go.mod text; `path` is only used in error messages.
    pub fn parse(path: impl AsRef<Path>, content: &str) -> Result<Self> {
        let path = path.as_ref();
        let mut module_path = None;
        let mut requires = Vec::new();
        let mut replaces = Vec::new();
        let mut block: Option<String> = None;

        for (index, raw_line) in content.lines().enumerate() {
            let at = || format!("{}:{}", path.display(), index + 1);
            let tokens = tokenize(raw_line).with_context(at)?;
            if tokens.is_empty() {
                continue;
            }

            if block.is_some() && tokens == [")"] {
                block = None;
                continue;
            }
            if block.is_none() && tokens.len() == 2 && tokens[1] == "(" {
                block = Some(tokens[0].clone());
                continue;
            }

            let (verb, args) = match &block {
                Some(verb) => (verb.clone(), &tokens[..]),
                None => (tokens[0].clone(), &tokens[1..]),
            };

            match verb.as_str() {
                "module" => {
                    if module_path.is_some() {
                        bail!("{}: repeated module statement", at());
                    }
                    let [name] = args else {
                        bail!("{}: usage: module module/path", at());
                    };
                    module_path = Some(name.clone());
                }
                "require" => {
                    let [dep, version] = args else {
                        bail!("{}: usage: require module/path v1.2.3", at());
                    };
                    requires.push(Requirement {
                        path: dep.clone(),
                        version: version.clone(),
                    });
                }
                "replace" => replaces.push(parse_replacement(args).with_context(at)?),
                _ => log::trace!("{}: skipping {} directive", at(), verb),
            }
        }

        if let Some(verb) = block {
            bail!("{}: unterminated {} block", path.display(), verb);
        }

        let module_path =
            module_path.ok_or_else(|| anyhow!("{}: no module statement", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            module_path,
            requires,
            replaces,
        })
    }
}

fn parse_replacement(args: &[String]) -> Result<Replacement> {
    let arrow = args
        .iter()
        .position(|t| t == "=>")
        .ok_or_else(|| anyhow!("usage: replace module/path [v1.2.3] => other/path [v1.4.5]"))?;
    let (old, new) = (&args[..arrow], &args[arrow + 1..]);
    let (old_path, old_version) = match old {
        [p] => (p.clone(), None),
        [p, v] => (p.clone(), Some(v.clone())),
        _ => bail!("replace needs a module path and an optional version before =>"),
    };
    let (new_path, new_version) = match new {
        [p] => (p.clone(), None),
        [p, v] => (p.clone(), Some(v.clone())),
        _ => bail!("replace needs a path and an optional version after =>"),
    };
    Ok(Replacement {
        old_path,
        old_version,
        new_path,
        new_version,
    })
}

/// Split a line into tokens, dropping any trailing `//` comment.
fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if line[start..].starts_with("//") {
            return Ok(tokens);
        } else if c == '"' || c == '`' {
            chars.next();
            let mut token = String::new();
            let mut closed = false;
            while let Some((_, q)) = chars.next() {
                if q == c {
                    closed = true;
                    break;
                }
                if q == '\\' && c == '"' {
                    if let Some((_, escaped)) = chars.next() {
                        token.push(escaped);
                    }
                    continue;
                }
                token.push(q);
            }
            if !closed {
                bail!("unterminated quoted string");
            }
            tokens.push(token);
        } else if c == '(' || c == ')' {
            chars.next();
            tokens.push(c.to_string());
        } else {
            let mut end = line.len();
            while let Some(&(i, t)) = chars.peek() {
                if t.is_whitespace() || t == '(' || t == ')' || line[i..].starts_with("//") {
                    end = i;
                    break;
                }
                chars.next();
            }
            tokens.push(line[start..end].to_string());
        }
    }

    Ok(tokens)
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;

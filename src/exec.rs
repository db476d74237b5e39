//! Running external commands, for real or as a dry run.
//!
//! Every side effect this tool has on a checkout goes through a [`Runner`].
//! The production implementation spawns processes. With the `test-util`
//! feature, `RecordingRunner` records what would have been run and replays
//! scripted output, which is what the tests use.

use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One command line, bound to the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I, dir: impl AsRef<Path>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// The process-execution capability.
///
/// With `dry_run` set an implementation must not touch the disk or the
/// network; it reports the command and returns empty output.
pub trait Runner {
    fn run(&self, invocation: &Invocation, dry_run: bool) -> Result<String>;
}

/// Spawns real processes and waits for them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&self, invocation: &Invocation, dry_run: bool) -> Result<String> {
        if dry_run {
            println!("in {:<60}; {}", invocation.dir.display(), invocation);
            return Ok(String::new());
        }

        log::debug!("in {}: {}", invocation.dir.display(), invocation);
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.dir)
            .output()
            .with_context(|| format!("Failed to run {}", invocation))?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            bail!("{} failed ({}) out={:?}", invocation, output.status, combined.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(any(test, feature = "test-util"))]
#[path = "recording.rs"]
mod recording;
#[cfg(any(test, feature = "test-util"))]
pub use recording::{Recorded, RecordingRunner};

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;

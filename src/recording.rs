//! Scripted [`Runner`] for tests.

use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::HashMap;

use super::{Invocation, Runner};

/// A command seen by a [`RecordingRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub invocation: Invocation,
    pub dry_run: bool,
}

/// A [`Runner`] that never spawns anything.
///
/// Commands are matched by their full command line (`git tag -l`).
/// Unscripted commands succeed with empty output. Dry-run calls are recorded
/// but never fail.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Recorded>>,
    responses: RefCell<HashMap<String, std::result::Result<String, String>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the output of a command line.
    pub fn respond(&self, command_line: &str, output: &str) -> &Self {
        self.responses
            .borrow_mut()
            .insert(command_line.to_string(), Ok(output.to_string()));
        self
    }

    /// Script a failure for a command line.
    pub fn fail(&self, command_line: &str, output: &str) -> &Self {
        self.responses
            .borrow_mut()
            .insert(command_line.to_string(), Err(output.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.borrow().clone()
    }

    /// Command lines seen so far, dry-run or not.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|r| r.invocation.to_string())
            .collect()
    }
}

impl Runner for RecordingRunner {
    fn run(&self, invocation: &Invocation, dry_run: bool) -> Result<String> {
        self.calls.borrow_mut().push(Recorded {
            invocation: invocation.clone(),
            dry_run,
        });
        if dry_run {
            return Ok(String::new());
        }
        match self.responses.borrow().get(&invocation.to_string()) {
            Some(Ok(out)) => Ok(out.clone()),
            Some(Err(out)) => Err(anyhow!("{} failed out={:?}", invocation, out)),
            None => Ok(String::new()),
        }
    }
}

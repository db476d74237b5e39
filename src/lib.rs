//! Tools for a git repository holding several interdependent Go modules.
//!
//! This crate discovers the modules of a checkout, reads their released
//! versions from git tags, rewrites go.mod files across the whole module
//! graph and drives the tag/branch release workflow.

pub mod checkout;
pub mod config;
pub mod edit;
pub mod exec;
pub mod git;
pub mod manifest;
pub mod module;
pub mod release;
pub mod repo;
pub mod tags;
pub mod version;
pub mod workspace;

pub use checkout::Checkout;
pub use config::Settings;
pub use edit::Editor;
pub use exec::{Invocation, ProcessRunner, Runner};
#[cfg(any(test, feature = "test-util"))]
pub use exec::RecordingRunner;
pub use git::GitRunner;
pub use manifest::GoMod;
pub use module::{Module, ModuleShortName};
pub use release::Releaser;
pub use repo::{LoadOptions, Repository};
pub use tags::{TagResolver, VersionMap};
pub use version::{BumpType, SemVer};
pub use workspace::WorkspaceScanner;

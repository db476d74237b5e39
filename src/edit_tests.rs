//! Tests for go.mod editing.

use crate::edit::{relative_path, Editor};
use crate::exec::RecordingRunner;
use crate::manifest::GoMod;
use crate::module::{Module, ModuleShortName};
use crate::version::SemVer;
use std::path::{Path, PathBuf};

const REPO: &str = "github.com/acme/widgets";
const ROOT: &str = "/work/widgets";

fn module(short_name: &str, gomod: &str) -> Module {
    Module::new(
        ModuleShortName::new(short_name),
        REPO,
        Path::new(ROOT),
        GoMod::parse("go.mod", gomod).unwrap(),
        SemVer::ZERO,
        SemVer::ZERO,
    )
}

#[test]
fn test_relative_path() {
    assert_eq!(relative_path(0, "kyaml"), "./kyaml");
    assert_eq!(relative_path(1, "kyaml"), "../kyaml");
    assert_eq!(relative_path(3, "cmd/config"), "../../../cmd/config");
    assert_eq!(relative_path(2, ""), "../../");
}

#[test]
fn test_tidy() {
    let runner = RecordingRunner::new();
    let api = module("api", "module github.com/acme/widgets/api\n");

    Editor::new(&api, &runner, false).tidy().unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].invocation.to_string(), "go mod tidy");
    assert_eq!(calls[0].invocation.dir, PathBuf::from("/work/widgets/api"));
    assert!(!calls[0].dry_run);
}

#[test]
fn test_pin() {
    let runner = RecordingRunner::new();
    let api = module("api", "module github.com/acme/widgets/api\n");
    let kyaml = module("kyaml", "module github.com/acme/widgets/kyaml/v2\n");

    Editor::new(&api, &runner, true)
        .pin(&kyaml, "v2.0.0", SemVer::new(2, 1, 0))
        .unwrap();

    assert_eq!(
        runner.command_lines(),
        vec![
            "go mod edit \
             -dropreplace=github.com/acme/widgets/kyaml/v2@v2.0.0 \
             -require=github.com/acme/widgets/kyaml/v2@v2.1.0"
        ]
    );
    assert!(runner.calls()[0].dry_run);
}

#[test]
fn test_unpin_from_nested_module_to_root() {
    let runner = RecordingRunner::new();
    let top = module("", "module github.com/acme/widgets\n");
    let leaf = module(
        "a/b",
        "module github.com/acme/widgets/a/b\nrequire github.com/acme/widgets v1.0.0\n",
    );
    let depth = leaf.short_name().depth();
    assert_eq!(depth, 2);

    Editor::new(&leaf, &runner, false)
        .unpin(depth, &top, "v1.0.0")
        .unwrap();

    assert_eq!(
        runner.command_lines(),
        vec!["go mod edit -replace=github.com/acme/widgets@v1.0.0=../../"]
    );
    assert_eq!(runner.calls()[0].invocation.dir, PathBuf::from("/work/widgets/a/b"));
}

#[test]
fn test_unpin_from_root() {
    let runner = RecordingRunner::new();
    let top = module("", "module github.com/acme/widgets\n");
    let kyaml = module("kyaml", "module github.com/acme/widgets/kyaml\n");

    Editor::new(&top, &runner, false)
        .unpin(0, &kyaml, "v0.3.0")
        .unwrap();

    assert_eq!(
        runner.command_lines(),
        vec!["go mod edit -replace=github.com/acme/widgets/kyaml@v0.3.0=./kyaml"]
    );
    assert_eq!(runner.calls()[0].invocation.dir, PathBuf::from(ROOT));
}

#[test]
fn test_tool_failure_is_propagated_with_output() {
    let runner = RecordingRunner::new();
    runner.fail("go mod tidy", "go: updates to go.mod needed");
    let api = module("api", "module github.com/acme/widgets/api\n");

    let err = Editor::new(&api, &runner, false).tidy().unwrap_err();

    assert!(err.to_string().contains("Failed to edit module api"));
    assert!(format!("{:#}", err).contains("updates to go.mod needed"));
}

//! Tests for module discovery.

use crate::workspace::{ProtoModule, WorkspaceScanner, DEFAULT_EXCLUSIONS};
use crate::manifest::GoMod;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const REPO: &str = "github.com/acme/widgets";

fn write_module(root: &Path, rel: &str, module_path: &str) {
    let dir = root.join(rel);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("go.mod"), format!("module {}\n\ngo 1.21\n", module_path)).unwrap();
}

fn create_test_workspace() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_module(root, "", REPO);
    write_module(root, "api", &format!("{}/api", REPO));
    write_module(root, "cmd/config", &format!("{}/cmd/config", REPO));
    write_module(root, "kyaml", &format!("{}/kyaml/v2", REPO));

    // Nested below a module: never reached.
    write_module(root, "api/internal/tool", &format!("{}/api/internal/tool", REPO));
    // Inside excluded directories: never reached.
    write_module(root, "examples/hello", &format!("{}/examples/hello", REPO));
    write_module(root, "docs/site", &format!("{}/docs/site", REPO));

    fs::write(root.join("README.md"), "# widgets\n").unwrap();
    temp_dir
}

fn rel_paths(modules: &[ProtoModule]) -> Vec<PathBuf> {
    modules.iter().map(|m| m.rel_path.clone()).collect()
}

fn proto(rel: &str, module_path: &str) -> ProtoModule {
    ProtoModule {
        rel_path: PathBuf::from(rel),
        manifest: GoMod::parse(Path::new(rel).join("go.mod"), &format!("module {}\n", module_path))
            .unwrap(),
    }
}

#[test]
fn test_find_modules() {
    let temp_dir = create_test_workspace();
    let scanner = WorkspaceScanner::new(temp_dir.path(), DEFAULT_EXCLUSIONS.iter().copied());

    let modules = scanner.find_modules().unwrap();

    assert_eq!(
        rel_paths(&modules),
        vec![
            PathBuf::from(""),
            PathBuf::from("api"),
            PathBuf::from("cmd/config"),
            PathBuf::from("kyaml"),
        ]
    );
    assert_eq!(modules[3].manifest.module_path, format!("{}/kyaml/v2", REPO));
}

#[test]
fn test_exclusions_are_configurable() {
    let temp_dir = create_test_workspace();
    let scanner = WorkspaceScanner::new(temp_dir.path(), ["cmd", "kyaml"]);

    let modules = scanner.find_modules().unwrap();

    assert_eq!(
        rel_paths(&modules),
        vec![
            PathBuf::from(""),
            PathBuf::from("api"),
            PathBuf::from("docs/site"),
            PathBuf::from("examples/hello"),
        ]
    );
}

#[test]
fn test_exclusion_matches_name_not_path() {
    let temp_dir = TempDir::new().unwrap();
    write_module(temp_dir.path(), "tools/docs", &format!("{}/tools/docs", REPO));
    write_module(temp_dir.path(), "docs", &format!("{}/docs", REPO));

    let scanner = WorkspaceScanner::new(temp_dir.path(), ["docs"]);
    assert!(scanner.find_modules().unwrap().is_empty());
}

#[test]
fn test_unparsable_manifest_aborts() {
    let temp_dir = create_test_workspace();
    fs::create_dir_all(temp_dir.path().join("broken")).unwrap();
    fs::write(temp_dir.path().join("broken/go.mod"), "go 1.21\n").unwrap();

    let scanner = WorkspaceScanner::new(temp_dir.path(), DEFAULT_EXCLUSIONS.iter().copied());
    assert!(scanner.find_modules().is_err());
}

#[test]
fn test_short_name() {
    assert!(proto("", REPO).short_name(REPO).unwrap().is_top());
    assert!(proto("", &format!("{}/v3", REPO)).short_name(REPO).unwrap().is_top());
    assert_eq!(
        proto("fruit/yellow/banana", &format!("{}/fruit/yellow/banana", REPO))
            .short_name(REPO)
            .unwrap()
            .as_str(),
        "fruit/yellow/banana"
    );
    assert_eq!(
        proto("kyaml", &format!("{}/kyaml/v2", REPO))
            .short_name(REPO)
            .unwrap()
            .as_str(),
        "kyaml"
    );
}

#[test]
fn test_short_name_rejects_foreign_module() {
    let err = proto("api", "github.com/other/api").short_name(REPO).unwrap_err();
    assert!(err.to_string().contains("doesn't start with the repository name"));

    assert!(proto("", "github.com/acme/widgetsx").short_name(REPO).is_err());
}

#[test]
fn test_short_name_rejects_misplaced_module() {
    let err = proto("api", &format!("{}/kyaml", REPO)).short_name(REPO).unwrap_err();
    assert!(err.to_string().contains("doesn't match the file's path"));

    assert!(proto("api", REPO).short_name(REPO).is_err());
}

#[test]
fn test_short_name_rejects_module_nested_under_other_directory() {
    // The declared path ends like the location but the module would be
    // edited in root/kyaml, not where its go.mod lives.
    let err = proto("third_party/kyaml", &format!("{}/kyaml", REPO))
        .short_name(REPO)
        .unwrap_err();
    assert!(err.to_string().contains("doesn't match the file's path"));

    assert!(proto("vendor/fruit/banana", &format!("{}/fruit/banana", REPO))
        .short_name(REPO)
        .is_err());
}

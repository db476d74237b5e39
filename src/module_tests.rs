use crate::manifest::GoMod;
use crate::module::{strip_major_suffix, Module, ModuleShortName};
use crate::version::SemVer;
use std::path::Path;

const REPO: &str = "gh.com/hoser";

fn module(short_name: &str, gomod: &str) -> Module {
    let manifest = GoMod::parse("go.mod", gomod).unwrap();
    Module::new(
        ModuleShortName::new(short_name),
        REPO,
        Path::new("/src/gh.com/hoser"),
        manifest,
        SemVer::ZERO,
        SemVer::ZERO,
    )
}

#[test]
fn test_depth() {
    assert_eq!(ModuleShortName::top().depth(), 0);
    assert_eq!(ModuleShortName::new("one").depth(), 1);
    assert_eq!(ModuleShortName::new("one/two/three").depth(), 3);
}

#[test]
fn test_from_arg() {
    assert!(ModuleShortName::from_arg("{top}").is_top());
    assert!(ModuleShortName::from_arg(".").is_top());
    assert!(ModuleShortName::from_arg("").is_top());
    assert_eq!(ModuleShortName::from_arg("./kyaml/").as_str(), "kyaml");
}

#[test]
fn test_display() {
    assert_eq!(ModuleShortName::top().to_string(), "{top}");
    assert_eq!(ModuleShortName::new("cmd/config").to_string(), "cmd/config");
}

#[test]
fn test_strip_major_suffix() {
    assert_eq!(strip_major_suffix("gh.com/hoser/garage/v2"), "gh.com/hoser/garage");
    assert_eq!(strip_major_suffix("gh.com/hoser/garage/v12"), "gh.com/hoser/garage");
    assert_eq!(strip_major_suffix("gh.com/hoser/garage"), "gh.com/hoser/garage");
    assert_eq!(strip_major_suffix("gh.com/hoser/v"), "gh.com/hoser/v");
    assert_eq!(strip_major_suffix("gh.com/hoser/v2beta"), "gh.com/hoser/v2beta");
}

#[test]
fn test_paths() {
    let top = module("", "module gh.com/hoser\n");
    assert_eq!(top.import_path(), "gh.com/hoser");
    assert_eq!(top.abs_path(), Path::new("/src/gh.com/hoser"));

    let banana = module(
        "fruit/yellow/banana",
        "module gh.com/hoser/fruit/yellow/banana/v2\n",
    );
    assert_eq!(banana.import_path(), "gh.com/hoser/fruit/yellow/banana");
    assert_eq!(banana.module_path(), "gh.com/hoser/fruit/yellow/banana/v2");
    assert_eq!(
        banana.abs_path(),
        Path::new("/src/gh.com/hoser/fruit/yellow/banana")
    );
}

#[test]
fn test_depends_on() {
    let garage = module("garage", "module gh.com/hoser/garage\n");
    let kyaml = module("kyaml", "module gh.com/hoser/kyaml/v2\n");
    let api = module(
        "api",
        "module gh.com/hoser/api\n\
         require (\n\
         \tgh.com/hoser/garage v1.2.3\n\
         \tgh.com/hoser/kyaml/v2 v2.0.1\n\
         \tgh.com/hoser/garagesale v0.0.1\n\
         )\n",
    );

    assert_eq!(api.depends_on(&garage), Some("v1.2.3"));
    assert_eq!(api.depends_on(&kyaml), Some("v2.0.1"));
    assert_eq!(garage.depends_on(&api), None);
    assert_eq!(garage.depends_on(&kyaml), None);
}

#[test]
fn test_depends_on_root_module() {
    let top = module("", "module gh.com/hoser\n");
    let leaf = module(
        "a/b",
        "module gh.com/hoser/a/b\nrequire gh.com/hoser v1.0.0\n",
    );

    assert_eq!(leaf.depends_on(&top), Some("v1.0.0"));
}

#[test]
fn test_replaces_with_local() {
    let garage = module("garage", "module gh.com/hoser/garage\n");
    let kyaml = module("kyaml", "module gh.com/hoser/kyaml/v2\n");
    let shed = module("shed", "module gh.com/hoser/shed\n");
    let api = module(
        "api",
        "module gh.com/hoser/api\n\
         require (\n\
         \tgh.com/hoser/garage v1.2.3\n\
         \tgh.com/hoser/kyaml/v2 v2.0.1\n\
         \tgh.com/hoser/shed v0.1.0\n\
         )\n\
         replace gh.com/hoser/garage v1.2.3 => ../garage\n\
         replace gh.com/hoser/kyaml/v2 => ./kyaml\n\
         replace gh.com/hoser/shed => gh.com/fork/shed v0.1.1\n",
    );

    assert!(api.replaces_with_local(&garage));
    assert!(api.replaces_with_local(&kyaml));
    assert!(!api.replaces_with_local(&shed));
    assert!(!garage.replaces_with_local(&api));
}

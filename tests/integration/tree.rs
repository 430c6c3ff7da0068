//! Integration tests for the `extdep tree` command.

use crate::common::{REST_MANIFEST, TestProject};
use anyhow::Result;
use predicates::prelude::*;

#[test]
fn test_tree_basic() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(REST_MANIFEST)?;

    project
        .command()
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("app\n"))
        .stdout(predicate::str::contains("└── project:app:unspecified [local]"))
        .stdout(predicate::str::contains("org.acme:rest:1.0 [extension, top-level]"))
        .stdout(predicate::str::contains("org.acme:core:1.0"))
        .stdout(predicate::str::contains("org.acme:rest-jackson:1.0 [extension, conditional]"))
        .stdout(predicate::str::contains("org.acme:jackson:1.0"));
    Ok(())
}

#[test]
fn test_tree_json_format() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(REST_MANIFEST)?;

    let output = project.run_extdep(&["tree", "--format", "json"])?;
    output.assert_success();
    let json = output.json();

    let root = &json[0];
    assert_eq!(root["coords"], "project:app:unspecified");
    assert_eq!(root["local"], true);
    let rest = &root["children"][0];
    assert_eq!(rest["coords"], "org.acme:rest:1.0");
    assert_eq!(rest["extension"], true);
    assert_eq!(rest["top_level"], true);

    let conditional: Vec<&serde_json::Value> = rest["children"]
        .as_array()
        .expect("children array")
        .iter()
        .filter(|child| child["conditional"] == true)
        .collect();
    assert_eq!(conditional.len(), 1);
    assert_eq!(conditional[0]["coords"], "org.acme:rest-jackson:1.0");
    Ok(())
}

#[test]
fn test_tree_without_dependencies() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest("[project]\nname = \"empty\"\n")?;

    project
        .command()
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("empty"))
        .stdout(predicate::str::contains("project:empty:unspecified [local]"));
    Ok(())
}

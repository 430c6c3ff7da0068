//! Integration tests for the `extdep resolve` command.

use crate::common::{REST_MANIFEST, TestProject};
use anyhow::Result;
use predicates::prelude::*;

const DEV_MANIFEST: &str = r#"
[project]
name = "app"
dependencies = ["org.acme:web:1.0"]

[[component]]
coords = "org.acme:web:1.0"

[component.extension]
deployment-artifact = "org.acme:web-deployment"
conditional-dev-dependencies = ["org.acme:web-dev-ui"]

[[component]]
coords = "org.acme:web-dev-ui:1.0"
"#;

const CHAIN_MANIFEST: &str = r#"
[project]
name = "app"
dependencies = ["org.acme:a:1.0"]

[[component]]
coords = "org.acme:a:1.0"

[component.extension]
deployment-artifact = "org.acme:a-deployment"
conditional-dependencies = ["org.acme:b"]

[[component]]
coords = "org.acme:b:1.0"

[component.extension]
deployment-artifact = "org.acme:b-deployment"
conditional-dependencies = ["org.acme:c"]

[[component]]
coords = "org.acme:c:1.0"
"#;

#[test]
fn test_resolve_text_output() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(REST_MANIFEST)?;

    let output = project.run_extdep(&["resolve"])?;
    output
        .assert_success()
        .assert_stdout_contains("app (normal): 1 pass(es), exhausted")
        .assert_stdout_contains("  org.acme:rest\n")
        .assert_stdout_contains("    + org.acme:rest-jackson:1.0 (extension)")
        .assert_stdout_contains("  org.acme:rest-deployment:1.0 (org.acme:rest)")
        .assert_stdout_contains("  org.acme:rest-deployment (conditional)")
        .assert_stdout_contains("    + org.acme:rest-jackson-deployment:1.0");
    assert!(!output.stdout.contains("Unsatisfied"));
    Ok(())
}

#[test]
fn test_resolve_json_output() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(REST_MANIFEST)?;

    let output = project.run_extdep(&["resolve", "--format", "json"])?;
    output.assert_success();
    let json = output.json();

    assert_eq!(json["project"], "app");
    assert_eq!(json["launch_mode"], "normal");
    assert_eq!(json["iterations"], 1);
    assert_eq!(json["termination"], "exhausted");
    assert_eq!(json["conditional"]["org.acme:rest"][0]["artifact"], "org.acme:rest-jackson:1.0");
    assert_eq!(json["deployment"]["direct"][0]["coords"], "org.acme:rest-deployment:1.0");
    assert_eq!(
        json["deployment"]["conditional"]["org.acme:rest-deployment"][0]["coords"],
        "org.acme:rest-jackson-deployment:1.0"
    );
    assert!(json.get("variants").is_none());
    Ok(())
}

#[test]
fn test_resolve_variants() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(REST_MANIFEST)?;

    project
        .command()
        .args(["resolve", "--variants"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Variants: quarkusConditionalProdRuntimeClasspath"))
        .stdout(predicate::str::contains("quarkus.prod.conditional-dependency.app=on"))
        .stdout(predicate::str::contains("quarkus.prod.deployment-dependency.app=on"));
    Ok(())
}

#[test]
fn test_resolve_dev_mode_enables_dev_dependencies() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(DEV_MANIFEST)?;

    let normal = project.run_extdep(&["resolve", "--format", "json"])?;
    normal.assert_success();
    assert_eq!(normal.json()["conditional"], serde_json::json!({}));

    let dev = project.run_extdep(&["resolve", "--mode", "dev", "--format", "json"])?;
    dev.assert_success();
    let json = dev.json();
    assert_eq!(json["launch_mode"], "development");
    assert_eq!(json["conditional"]["org.acme:web"][0]["artifact"], "org.acme:web-dev-ui:1.0");
    Ok(())
}

#[test]
fn test_resolve_launch_mode_from_config() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(DEV_MANIFEST)?;
    project.write_config("launch_mode = \"development\"\n")?;

    let output = project.run_extdep(&["resolve"])?;
    output
        .assert_success()
        .assert_stdout_contains("app (development)")
        .assert_stdout_contains("    + org.acme:web-dev-ui:1.0");
    Ok(())
}

#[test]
fn test_resolve_chain_takes_one_pass_per_link() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(CHAIN_MANIFEST)?;

    let output = project.run_extdep(&["resolve", "--format", "json"])?;
    output.assert_success();
    let json = output.json();
    assert_eq!(json["iterations"], 2);
    assert_eq!(json["termination"], "exhausted");
    Ok(())
}

#[test]
fn test_resolve_max_iterations_flag() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(CHAIN_MANIFEST)?;

    let output = project.run_extdep(&["resolve", "--max-iterations", "1"])?;
    output
        .assert_success()
        .assert_stdout_contains("1 pass(es), iteration limit reached")
        .assert_stdout_contains("Unsatisfied:")
        .assert_stdout_contains("  org.acme:c (requested by org.acme:b)");
    Ok(())
}

#[test]
fn test_resolve_rejects_zero_max_iterations() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(CHAIN_MANIFEST)?;

    project.command().args(["resolve", "--max-iterations", "0"]).assert().failure();
    Ok(())
}

#[test]
fn test_resolve_excluded_conditional() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(
        r#"
[project]
name = "app"
dependencies = ["org.acme:rest:1.0"]

[[platform.exclusions]]
group = "org.unwanted"

[[component]]
coords = "org.acme:rest:1.0"

[component.extension]
deployment-artifact = "org.acme:rest-deployment"
conditional-dependencies = ["org.unwanted:thing"]
"#,
    )?;

    let output = project.run_extdep(&["resolve"])?;
    output
        .assert_success()
        .assert_stdout_contains("Excluded:")
        .assert_stdout_contains("  org.unwanted:thing\n");
    Ok(())
}

#[test]
fn test_resolve_with_explicit_manifest_path() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("nested/extdep.toml", REST_MANIFEST)?;

    project
        .command()
        .args(["--manifest-path", "nested/extdep.toml", "resolve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("org.acme:rest-jackson:1.0"));
    Ok(())
}

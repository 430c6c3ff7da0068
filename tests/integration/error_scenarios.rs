//! Exit codes and error messages of failing commands.

use crate::common::{REST_MANIFEST, TestProject};
use anyhow::Result;
use predicates::prelude::*;

#[test]
fn test_missing_manifest() -> Result<()> {
    let project = TestProject::new()?;

    project
        .command()
        .arg("resolve")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("extdep.toml not found"));
    Ok(())
}

#[test]
fn test_explicit_manifest_path_missing() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(REST_MANIFEST)?;

    project
        .command()
        .args(["--manifest-path", "other/extdep.toml", "tree"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("extdep.toml not found"));
    Ok(())
}

#[test]
fn test_unresolvable_conditional_dependency() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(
        r#"
[project]
name = "app"
dependencies = ["org.acme:rest:1.0"]

[[component]]
coords = "org.acme:rest:1.0"

[component.extension]
deployment-artifact = "org.acme:rest-deployment"
conditional-dependencies = ["org.acme:missing"]
"#,
    )?;

    let output = project.run_extdep(&["resolve"])?;
    assert!(!output.success);
    assert_eq!(output.code, Some(1));
    assert!(
        output.stderr.contains("org.acme:missing did not resolve to any artifacts"),
        "stderr: {}",
        output.stderr
    );
    assert!(output.stderr.contains("Requested as a conditional dependency by: org.acme:rest"));
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn test_invalid_manifest_syntax() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest("[project\nname = \"app\"\n")?;

    project
        .command()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid manifest file syntax"));
    Ok(())
}

#[test]
fn test_unknown_manifest_field() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest("[project]\nname = \"app\"\nflavour = \"vanilla\"\n")?;

    project
        .command()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid manifest file syntax"));
    Ok(())
}

#[test]
fn test_unknown_component_dependency() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(
        r#"
[project]
name = "app"
dependencies = ["org.acme:ghost:1.0"]
"#,
    )?;

    project
        .command()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown dependency 'org.acme:ghost:1.0'"));
    Ok(())
}

#[test]
fn test_invalid_global_config() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(REST_MANIFEST)?;
    project.write_config("max_iterations = 0\n")?;

    project
        .command()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_iterations must be at least 1"));
    Ok(())
}

#[test]
fn test_verbose_conflicts_with_quiet() -> Result<()> {
    let project = TestProject::new()?;

    project
        .command()
        .args(["--verbose", "--quiet", "resolve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
    Ok(())
}

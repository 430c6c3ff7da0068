//! Integration tests for the `extdep descriptor` command.

use crate::common::TestProject;
use anyhow::Result;
use predicates::prelude::*;

const DESCRIPTOR: &str = "\
# Generated extension descriptor
deployment-artifact=io.quarkus\\:quarkus-rest-deployment\\:3.2.0
conditional-dependencies=io.quarkus:quarkus-rest-jackson \\
    io.quarkus:quarkus-rest-qute:3.2.0
dependency-condition=io.quarkus:quarkus-jackson
";

#[test]
fn test_descriptor_text() -> Result<()> {
    let project = TestProject::new()?;
    let path = project.write_file("quarkus-extension.properties", DESCRIPTOR)?;

    project
        .command()
        .arg("descriptor")
        .arg(&path)
        .args(["--artifact", "io.quarkus:quarkus-rest:3.2.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extension io.quarkus:quarkus-rest:3.2.0"))
        .stdout(predicate::str::contains("deployment: io.quarkus:quarkus-rest-deployment:3.2.0"))
        .stdout(predicate::str::contains("    - io.quarkus:quarkus-rest-jackson\n"))
        .stdout(predicate::str::contains("    - io.quarkus:quarkus-rest-qute:3.2.0\n"))
        .stdout(predicate::str::contains("conditional dev dependencies: (none)"))
        .stdout(predicate::str::contains("    - io.quarkus:quarkus-jackson\n"));
    Ok(())
}

#[test]
fn test_descriptor_json_defaults_runtime_to_file_name() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file(
        "quarkus-arc.properties",
        "deployment-artifact=io.quarkus:quarkus-arc-deployment\n",
    )?;

    let output = project.run_extdep(&["descriptor", "quarkus-arc.properties", "--format", "json"])?;
    output.assert_success();
    let json = output.json();
    assert_eq!(json["runtime"], "unspecified:quarkus-arc:unspecified");
    assert_eq!(json["deployment"], "io.quarkus:quarkus-arc-deployment:unspecified");
    assert_eq!(json["conditional_dependencies"], serde_json::json!([]));
    Ok(())
}

#[test]
fn test_descriptor_missing_deployment_artifact() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("broken.properties", "conditional-dependencies=g:a\n")?;

    project
        .command()
        .args(["descriptor", "broken.properties"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing 'deployment-artifact'"));
    Ok(())
}

#[test]
fn test_descriptor_file_not_found() -> Result<()> {
    let project = TestProject::new()?;

    project
        .command()
        .args(["descriptor", "nope.properties"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read descriptor: nope.properties"));
    Ok(())
}

#[test]
fn test_descriptor_default_location() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file(
        "META-INF/quarkus-extension.properties",
        "deployment-artifact=io.quarkus:quarkus-arc-deployment:3.2.0\n",
    )?;

    project
        .command()
        .arg("descriptor")
        .assert()
        .success()
        .stdout(predicate::str::contains("deployment: io.quarkus:quarkus-arc-deployment:3.2.0"));
    Ok(())
}

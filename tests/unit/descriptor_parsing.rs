//! Extension descriptor parsing through the public metadata API.

use extdep_cli::metadata::MetadataExtractor;
use extdep_cli::models::{ArtifactCoords, ArtifactKey, DependencyRef};

fn runtime() -> ArtifactCoords {
    ArtifactCoords::jar("io.quarkus", "quarkus-rest", "3.2.0")
}

#[test]
fn descriptor_with_every_key() {
    let content = "\
deployment-artifact=io.quarkus\\:quarkus-rest-deployment\\:3.2.0
conditional-dependencies=io.quarkus:quarkus-rest-jackson io.quarkus:quarkus-rest-qute:3.2.0
conditional-dev-dependencies=io.quarkus:quarkus-rest-dev-ui
dependency-condition=io.quarkus:quarkus-jackson
unrelated=ignored
";
    let descriptor = MetadataExtractor::extract(&runtime(), content).unwrap();

    assert_eq!(
        descriptor.deployment,
        ArtifactCoords::jar("io.quarkus", "quarkus-rest-deployment", "3.2.0")
    );
    assert_eq!(
        descriptor.conditional_dependencies,
        vec![
            DependencyRef::new("io.quarkus", "quarkus-rest-jackson", None),
            DependencyRef::new("io.quarkus", "quarkus-rest-qute", Some("3.2.0".to_string())),
        ]
    );
    assert_eq!(descriptor.conditional_dev_dependencies.len(), 1);
    assert_eq!(
        descriptor.dependency_conditions,
        vec![ArtifactKey::ga("io.quarkus", "quarkus-jackson")]
    );
    assert!(descriptor.has_conditional_dependencies());
}

#[test]
fn deployment_version_defaults_to_runtime() {
    let descriptor =
        MetadataExtractor::extract(&runtime(), "deployment-artifact=io.quarkus:quarkus-rest-deployment")
            .unwrap();
    assert_eq!(descriptor.deployment.version, "3.2.0");
    assert!(!descriptor.has_conditional_dependencies());
}

#[test]
fn malformed_entries_are_rejected() {
    let missing = MetadataExtractor::extract(&runtime(), "conditional-dependencies=g:a");
    assert!(missing.unwrap_err().to_string().contains("deployment-artifact"));

    let bad_list = MetadataExtractor::extract(
        &runtime(),
        "deployment-artifact=g:d\nconditional-dependencies=not-a-coordinate",
    );
    assert!(bad_list.is_err());
}

#[test]
fn properties_continuation_lines() {
    let props = MetadataExtractor::parse_properties(
        "conditional-dependencies=g:a \\\n    g:b \\\n    g:c\n# trailing comment\n",
    );
    assert_eq!(props["conditional-dependencies"], "g:a g:b g:c");
    assert_eq!(props.len(), 1);
}

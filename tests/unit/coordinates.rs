//! Parsing and display of artifact keys, coordinates and dependency references.

use extdep_cli::core::ExtdepError;
use extdep_cli::models::{ArtifactCoords, ArtifactKey, DependencyRef};

#[test]
fn coords_parse_all_forms() {
    let jar: ArtifactCoords = "io.quarkus:quarkus-arc:3.2.0".parse().unwrap();
    assert_eq!(jar, ArtifactCoords::jar("io.quarkus", "quarkus-arc", "3.2.0"));
    assert_eq!(jar.to_string(), "io.quarkus:quarkus-arc:3.2.0");

    let pom: ArtifactCoords = "io.quarkus:quarkus-bom:pom:3.2.0".parse().unwrap();
    assert!(pom.is_pom());
    assert_eq!(pom.to_string(), "io.quarkus:quarkus-bom:3.2.0@pom");
    assert_eq!(pom.to_gactv_string(), "io.quarkus:quarkus-bom:pom:3.2.0");

    let classified: ArtifactCoords = "g:a:tests:jar:1".parse().unwrap();
    assert_eq!(classified.key.classifier, "tests");
    assert_eq!(classified.to_string(), "g:a:1:tests");
    assert_eq!(classified.to_gactv_string(), "g:a:tests:jar:1");
}

#[test]
fn coords_reject_malformed_input() {
    for value in ["g:a", "g", ":a:1", "g::1", "g:a:b:c:d:e"] {
        let err = value.parse::<ArtifactCoords>().unwrap_err();
        assert!(
            matches!(err, ExtdepError::InvalidCoordinates { .. }),
            "'{value}' should be rejected, got {err}"
        );
    }
}

#[test]
fn dependency_ref_with_and_without_version() {
    let unversioned: DependencyRef = "org.acme:lib".parse().unwrap();
    assert!(unversioned.version.is_none());
    assert_eq!(unversioned.to_string(), "org.acme:lib");

    let versioned: DependencyRef = "org.acme:lib:2.1".parse().unwrap();
    assert_eq!(versioned.version.as_deref(), Some("2.1"));
    assert_eq!(versioned.key(), ArtifactKey::ga("org.acme", "lib"));

    let pinned = unversioned.with_version("3.0");
    assert_eq!(pinned.to_string(), "org.acme:lib:3.0");
}

#[test]
fn artifact_key_identity_ignores_version() {
    let a = ArtifactCoords::jar("g", "a", "1");
    let b = ArtifactCoords::jar("g", "a", "2");
    assert_eq!(a.key, b.key);
    assert_eq!(a.key.module_name(), "g:a");
    assert!(a.key.same_module("g", "a"));
    assert!(!a.key.same_module("g", "b"));
}

#[test]
fn artifact_key_display_round_trips() {
    let key: ArtifactKey = "g:a:sources".parse().unwrap();
    assert_eq!(key.to_string(), "g:a:sources");
    assert_eq!(key.to_string().parse::<ArtifactKey>().unwrap(), key);

    let pom: ArtifactKey = "g:a::pom".parse().unwrap();
    assert_eq!(pom.to_string(), "g:a::pom");
    assert_eq!(pom.to_string().parse::<ArtifactKey>().unwrap(), pom);

    let plain: ArtifactKey = "g:a".parse().unwrap();
    assert_eq!(plain.to_string(), "g:a");
}

//! Platform constraints and exclusion rules.

use extdep_cli::models::DependencyRef;
use extdep_cli::platform::{ExclusionRule, PlatformConstraints, PlatformSpec};

#[test]
fn exclusion_globs_and_wildcards() {
    let group_only = ExclusionRule::new(Some("org.unwanted*"), None).unwrap();
    assert!(group_only.matches("org.unwanted", "anything"));
    assert!(group_only.matches("org.unwanted.sub", "x"));
    assert!(!group_only.matches("org.wanted", "x"));
    assert_eq!(group_only.to_string(), "org.unwanted*:*");

    let module_only = ExclusionRule::new(None, Some("*-test")).unwrap();
    assert!(module_only.matches("any.group", "lib-test"));
    assert!(!module_only.matches("any.group", "lib"));

    let both = ExclusionRule::new(Some("g"), Some("a")).unwrap();
    assert!(both.matches("g", "a"));
    assert!(!both.matches("g", "b"));
}

#[test]
fn invalid_exclusion_pattern() {
    assert!(ExclusionRule::new(Some("[unclosed"), None).is_err());
}

#[test]
fn platform_spec_constraints_and_exclusions() {
    let platform = PlatformSpec::default()
        .with_constraint("io.quarkus", "quarkus-jackson", "3.2.1")
        .with_exclusion(ExclusionRule::new(Some("org.unwanted"), None).unwrap());

    assert_eq!(
        platform.find_constraint("io.quarkus", "quarkus-jackson").as_deref(),
        Some("3.2.1")
    );
    assert!(platform.find_constraint("io.quarkus", "quarkus-arc").is_none());
    assert!(platform.is_excluded(&DependencyRef::new("org.unwanted", "x", None)));
    assert!(!platform.is_excluded(&DependencyRef::new("io.quarkus", "x", None)));
}

#[test]
fn platform_spec_from_toml() {
    let platform: PlatformSpec = toml::from_str(
        r#"
[constraints]
"g:a" = "1.0"

[[exclusions]]
module = "legacy-*"
"#,
    )
    .unwrap();
    assert_eq!(platform.find_constraint("g", "a").as_deref(), Some("1.0"));
    assert!(platform.is_excluded(&DependencyRef::new("any", "legacy-io", None)));
}

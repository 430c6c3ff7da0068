//! Library-level resolution of manifests loaded from disk.

use anyhow::Result;
use extdep_cli::core::ExtdepError;
use extdep_cli::manifest::{Manifest, RepositoryResolver};
use extdep_cli::models::{ArtifactCoords, ArtifactKey, LaunchMode};
use extdep_cli::resolver::{
    ApplicationResolver, ResolvedApplication, ResolverOptions, TerminationReason,
    VariantAttributeAssigner,
};

use crate::common::{REST_MANIFEST, TestProject};

const FILE_DESCRIPTOR_MANIFEST: &str = r#"
[project]
name = "shop"
group = "com.example"
version = "2.0"
dependencies = ["io.quarkus:quarkus-rest:3.2.0", "com.example:model:2.0"]

[platform.constraints]
"io.quarkus:quarkus-rest-jackson" = "3.2.1"

[[component]]
coords = "io.quarkus:quarkus-rest:3.2.0"
descriptor = "descriptors/quarkus-rest.properties"

[[component]]
coords = "com.example:model:2.0"
local = true
dependencies = ["io.quarkus:quarkus-jackson:3.2.0"]

[[component]]
coords = "io.quarkus:quarkus-jackson:3.2.0"

[[component]]
coords = "io.quarkus:quarkus-rest-jackson:3.2.0"

[[component]]
coords = "io.quarkus:quarkus-rest-jackson:3.2.1"
descriptor = "descriptors/quarkus-rest-jackson.properties"
"#;

const REST_DESCRIPTOR: &str = "\
deployment-artifact=io.quarkus:quarkus-rest-deployment
conditional-dependencies=io.quarkus:quarkus-rest-jackson
";

const REST_JACKSON_DESCRIPTOR: &str = "\
deployment-artifact=io.quarkus:quarkus-rest-jackson-deployment
dependency-condition=io.quarkus:quarkus-jackson
";

async fn resolve(project: &TestProject, options: ResolverOptions) -> Result<ResolvedApplication> {
    let manifest = Manifest::load(&project.manifest_path()).await?;
    let repository = RepositoryResolver::new(&manifest)?;
    let base = repository.base_configuration()?;
    ApplicationResolver::new(&repository, &repository, &manifest.platform, options).resolve(&base)
}

fn shop_project() -> Result<TestProject> {
    let project = TestProject::new()?;
    project.write_manifest(FILE_DESCRIPTOR_MANIFEST)?;
    project.write_file("descriptors/quarkus-rest.properties", REST_DESCRIPTOR)?;
    project.write_file("descriptors/quarkus-rest-jackson.properties", REST_JACKSON_DESCRIPTOR)?;
    Ok(project)
}

#[tokio::test]
async fn test_descriptor_files_and_platform_alignment() -> Result<()> {
    extdep_cli::test_utils::init_test_logging(None);
    let project = shop_project()?;

    let application = resolve(&project, ResolverOptions::default()).await?;

    assert_eq!(application.termination, TerminationReason::Exhausted);
    assert_eq!(application.iterations, 1);
    let enabled = &application.satisfied[&ArtifactKey::ga("io.quarkus", "quarkus-rest")];
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].artifact, ArtifactCoords::jar("io.quarkus", "quarkus-rest-jackson", "3.2.1"));

    let jackson = application
        .graph
        .get(&ArtifactKey::ga("io.quarkus", "quarkus-rest-jackson"))
        .expect("conditional dependency in graph");
    assert_eq!(jackson.coords.version, "3.2.1");
    assert!(jackson.is_extension());
    Ok(())
}

#[tokio::test]
async fn test_deployment_dependencies_from_loaded_manifest() -> Result<()> {
    let project = shop_project()?;

    let application = resolve(&project, ResolverOptions::default()).await?;

    let direct: Vec<String> =
        application.deployment.direct.iter().map(|dep| dep.coords.to_string()).collect();
    assert_eq!(direct, vec!["io.quarkus:quarkus-rest-deployment:3.2.0"]);

    let grouped = &application.deployment.conditional["io.quarkus:quarkus-rest-deployment"];
    assert_eq!(grouped.len(), 1);
    assert_eq!(
        grouped[0].coords,
        ArtifactCoords::jar("io.quarkus", "quarkus-rest-jackson-deployment", "3.2.1")
    );
    Ok(())
}

#[tokio::test]
async fn test_variants_for_loaded_manifest() -> Result<()> {
    let project = shop_project()?;
    let options = ResolverOptions {
        launch_mode: LaunchMode::Test,
        ..ResolverOptions::default()
    };

    let application = resolve(&project, options).await?;
    let variants = VariantAttributeAssigner::assign("shop", LaunchMode::Test, &application);

    assert_eq!(variants.configuration_name, "quarkusConditionalTestRuntimeClasspath");
    assert_eq!(variants.conditional_attribute, "quarkus.test.conditional-dependency.shop");
    assert_eq!(variants.conditional_variants.len(), 1);
    assert_eq!(variants.conditional_variants[0].module, "io.quarkus:quarkus-rest");
    let modules: Vec<&str> =
        variants.deployment_variants.iter().map(|variant| variant.module.as_str()).collect();
    assert_eq!(modules, vec!["com.example:shop", "io.quarkus:quarkus-rest-deployment"]);
    Ok(())
}

#[tokio::test]
async fn test_missing_descriptor_file() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(FILE_DESCRIPTOR_MANIFEST)?;

    let err = Manifest::load(&project.manifest_path()).await.unwrap_err();
    assert!(
        format!("{err:#}").contains("Failed to read descriptor of io.quarkus:quarkus-rest:3.2.0"),
        "unexpected error: {err:#}"
    );
    Ok(())
}

#[tokio::test]
async fn test_unresolvable_error_is_typed() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest(&REST_MANIFEST.replace(
        "conditional-dependencies = [\"org.acme:rest-jackson\"]",
        "conditional-dependencies = [\"org.acme:absent\"]",
    ))?;

    let err = resolve(&project, ResolverOptions::default()).await.unwrap_err();
    let typed = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ExtdepError>())
        .expect("typed resolver error");
    match typed {
        ExtdepError::UnresolvableDependency {
            coords,
            requested_by,
        } => {
            assert_eq!(coords, "org.acme:absent");
            assert_eq!(requested_by, &vec!["org.acme:rest".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

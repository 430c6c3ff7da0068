//! In-memory repositories for resolver tests.

use anyhow::{Context, Result};
use std::cell::RefCell;

use crate::manifest::{ComponentSpec, ExtensionSpec, Manifest, RepositoryResolver};
use crate::metadata::{ExtensionDescriptor, ExtensionMetadataSource};
use crate::models::{ArtifactCoords, ArtifactKey, DependencyRef, ResolvedDependency};
use crate::platform::{ExclusionRule, PlatformSpec};
use crate::resolver::{
    ApplicationResolver, DependencyResolver, ResolutionRequest, ResolvedApplication,
    ResolverOptions,
};

/// Builder for a manifest-backed repository.
///
/// Coordinates use the textual forms of [`ArtifactCoords`] and
/// [`DependencyRef`]; malformed input panics since fixtures are test code.
/// Extensions get a `<artifact>-deployment` deployment artifact with the
/// runtime version.
#[derive(Debug, Clone)]
pub struct GraphFixture {
    manifest: Manifest,
}

impl GraphFixture {
    pub fn new(project: &str) -> Self {
        Self {
            manifest: Manifest::new(project),
        }
    }

    /// Add a direct dependency of the project.
    pub fn depends_on(mut self, dependency: &str) -> Self {
        self.manifest.project.dependencies.push(parse_ref(dependency));
        self
    }

    /// Declare a plain module with its runtime dependencies.
    pub fn module(mut self, coords: &str, dependencies: &[&str]) -> Self {
        let component = self.component_mut(coords);
        component.dependencies.extend(dependencies.iter().map(|dep| parse_ref(dep)));
        self
    }

    /// Declare a workspace module.
    pub fn local_module(mut self, coords: &str, dependencies: &[&str]) -> Self {
        self = self.module(coords, dependencies);
        self.component_mut(coords).local = true;
        self
    }

    /// Make `coords` an extension with the given conditional dependencies.
    pub fn extension(mut self, coords: &str, conditional: &[&str]) -> Self {
        let spec = self.extension_mut(coords);
        spec.conditional_dependencies.extend(conditional.iter().map(|dep| parse_ref(dep)));
        self
    }

    /// Add development-only conditional dependencies to an extension.
    pub fn dev_conditional(mut self, coords: &str, dependencies: &[&str]) -> Self {
        let spec = self.extension_mut(coords);
        spec.conditional_dev_dependencies.extend(dependencies.iter().map(|dep| parse_ref(dep)));
        self
    }

    /// Add dependency conditions to an extension.
    pub fn condition(mut self, coords: &str, keys: &[&str]) -> Self {
        let spec = self.extension_mut(coords);
        spec.dependency_condition.extend(keys.iter().map(|key| {
            key.parse::<ArtifactKey>()
                .unwrap_or_else(|e| panic!("invalid artifact key '{key}': {e}"))
        }));
        self
    }

    /// Override the deployment artifact of an extension.
    pub fn deployment(mut self, coords: &str, deployment: &str) -> Self {
        self.extension_mut(coords).deployment_artifact = deployment.to_string();
        self
    }

    /// Declare `from` as a pom relocated to `to`.
    pub fn relocation(mut self, from: &str, to: &str) -> Self {
        self.component_mut(from).relocation = Some(parse_ref(to));
        self
    }

    pub fn constraint(mut self, module: &str, version: &str) -> Self {
        let (group, artifact) = module
            .split_once(':')
            .unwrap_or_else(|| panic!("constraint needs group:artifact, got '{module}'"));
        self.manifest.platform = self.manifest.platform.with_constraint(group, artifact, version);
        self
    }

    pub fn exclude(mut self, group: Option<&str>, module: Option<&str>) -> Self {
        let rule = ExclusionRule::new(group, module)
            .unwrap_or_else(|e| panic!("invalid exclusion rule: {e}"));
        self.manifest.platform = self.manifest.platform.with_exclusion(rule);
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn build(self) -> Result<FakeRepository> {
        FakeRepository::new(&self.manifest)
    }

    fn component_mut(&mut self, coords: &str) -> &mut ComponentSpec {
        let coords = parse_coords(coords);
        let position = self.manifest.components.iter().position(|c| c.coords == coords);
        let index = match position {
            Some(index) => index,
            None => {
                self.manifest.components.push(ComponentSpec::new(coords));
                self.manifest.components.len() - 1
            }
        };
        &mut self.manifest.components[index]
    }

    fn extension_mut(&mut self, coords: &str) -> &mut ExtensionSpec {
        let component = self.component_mut(coords);
        let deployment = format!(
            "{}:{}-deployment",
            component.coords.group_id(),
            component.coords.artifact_id()
        );
        component.extension.get_or_insert_with(|| ExtensionSpec {
            deployment_artifact: deployment,
            ..Default::default()
        })
    }
}

/// A [`RepositoryResolver`] that records every call made into it.
pub struct FakeRepository {
    repository: RepositoryResolver,
    platform: PlatformSpec,
    requests: RefCell<Vec<ResolutionRequest>>,
    metadata_lookups: RefCell<Vec<ArtifactCoords>>,
}

impl FakeRepository {
    pub fn new(manifest: &Manifest) -> Result<Self> {
        let repository =
            RepositoryResolver::new(manifest).context("Invalid fixture repository")?;
        Ok(Self {
            repository,
            platform: manifest.platform.clone(),
            requests: RefCell::new(Vec::new()),
            metadata_lookups: RefCell::new(Vec::new()),
        })
    }

    /// Base runtime configuration of the project. Not recorded.
    pub fn base(&self) -> Result<Vec<ResolvedDependency>> {
        self.repository.base_configuration()
    }

    pub fn platform(&self) -> &PlatformSpec {
        &self.platform
    }

    /// Run a full resolution against this repository.
    pub fn resolve_application(&self, options: ResolverOptions) -> Result<ResolvedApplication> {
        let base = self.base()?;
        ApplicationResolver::new(self, self, &self.platform, options).resolve(&base)
    }

    pub fn resolve_default(&self) -> Result<ResolvedApplication> {
        self.resolve_application(ResolverOptions::default())
    }

    /// Every request seen so far, in call order.
    pub fn requests(&self) -> Vec<ResolutionRequest> {
        self.requests.borrow().clone()
    }

    /// Number of non-transitive requests for `module` (`group:artifact`).
    pub fn resolution_count(&self, module: &str) -> usize {
        let key = parse_ref(module).key();
        self.requests
            .borrow()
            .iter()
            .filter(|request| !request.transitive)
            .filter(|request| request.dependencies.iter().any(|dep| dep.key() == key))
            .count()
    }

    /// Number of metadata lookups for `coords`.
    pub fn lookup_count(&self, coords: &str) -> usize {
        let coords = parse_coords(coords);
        self.metadata_lookups.borrow().iter().filter(|seen| **seen == coords).count()
    }

    pub fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
        self.metadata_lookups.borrow_mut().clear();
    }
}

impl DependencyResolver for FakeRepository {
    fn resolve(&self, request: &ResolutionRequest) -> Result<Vec<ResolvedDependency>> {
        self.requests.borrow_mut().push(request.clone());
        self.repository.resolve(request)
    }
}

impl ExtensionMetadataSource for FakeRepository {
    fn extension_for(&self, artifact: &ArtifactCoords) -> Result<Option<ExtensionDescriptor>> {
        self.metadata_lookups.borrow_mut().push(artifact.clone());
        self.repository.extension_for(artifact)
    }
}

/// A resolver whose every call fails, for error propagation tests.
pub struct FailingResolver {
    pub message: String,
}

impl DependencyResolver for FailingResolver {
    fn resolve(&self, _request: &ResolutionRequest) -> Result<Vec<ResolvedDependency>> {
        Err(anyhow::anyhow!("{}", self.message))
    }
}

fn parse_coords(value: &str) -> ArtifactCoords {
    value.parse().unwrap_or_else(|e| panic!("invalid coordinates '{value}': {e}"))
}

fn parse_ref(value: &str) -> DependencyRef {
    value.parse().unwrap_or_else(|e| panic!("invalid dependency '{value}': {e}"))
}

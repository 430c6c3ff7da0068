//! In-memory repository backed by the manifest components.

use anyhow::{Context, Result};
use std::collections::HashMap;

use super::{ComponentSpec, Manifest};
use crate::metadata::{ExtensionDescriptor, ExtensionMetadataSource};
use crate::models::{ArtifactCoords, DependencyRef, ModuleVersion, ResolvedDependency};
use crate::platform::ExclusionRule;
use crate::resolver::{DependencyResolver, ResolutionRequest};

/// Resolves dependencies and extension metadata from a [`Manifest`].
#[derive(Debug, Clone)]
pub struct RepositoryResolver {
    manifest: Manifest,
    descriptors: HashMap<ArtifactCoords, ExtensionDescriptor>,
}

impl RepositoryResolver {
    /// Validate `manifest` and parse every component descriptor up front.
    pub fn new(manifest: &Manifest) -> Result<Self> {
        manifest.validate()?;

        let mut descriptors = HashMap::new();
        for component in &manifest.components {
            let descriptor = component
                .extension_descriptor()
                .with_context(|| format!("Invalid extension component {}", component.coords))?;
            if let Some(descriptor) = descriptor {
                descriptors.insert(component.coords.clone(), descriptor);
            }
        }
        tracing::debug!(
            "Repository has {} component(s), {} extension(s)",
            manifest.components.len(),
            descriptors.len()
        );

        Ok(Self {
            manifest: manifest.clone(),
            descriptors,
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The project's runtime configuration: the local project root with its
    /// dependencies resolved transitively.
    pub fn base_configuration(&self) -> Result<Vec<ResolvedDependency>> {
        let request = ResolutionRequest::new(
            self.manifest.project.dependencies.clone(),
            self.manifest.platform.exclusions.clone(),
            true,
        );
        let children = self.resolve(&request)?;
        let root = ResolvedDependency::jar(self.manifest.project.coords())
            .local(true)
            .with_children(children);
        Ok(vec![root])
    }

    fn build(
        &self,
        component: &ComponentSpec,
        request: &ResolutionRequest,
        path: &mut Vec<ArtifactCoords>,
    ) -> ResolvedDependency {
        path.push(component.coords.clone());

        let mut children = Vec::new();
        if request.transitive {
            let next: Vec<&DependencyRef> = match &component.relocation {
                Some(target) => vec![target],
                None => component.dependencies.iter().collect(),
            };
            for dependency in next {
                let Some(child) = self.select(dependency, &request.exclusions) else {
                    continue;
                };
                if path.contains(&child.coords) {
                    tracing::debug!(
                        "Cutting dependency cycle {} -> {}",
                        component.coords,
                        child.coords
                    );
                    continue;
                }
                children.push(self.build(child, request, path));
            }
        }

        path.pop();
        ResolvedDependency {
            module: ModuleVersion::from(&component.coords),
            local: component.local,
            artifacts: component.artifacts(),
            children,
        }
    }

    fn select(
        &self,
        dependency: &DependencyRef,
        exclusions: &[ExclusionRule],
    ) -> Option<&ComponentSpec> {
        if let Some(rule) = exclusions
            .iter()
            .find(|rule| rule.matches(&dependency.group_id, &dependency.artifact_id))
        {
            tracing::debug!("{} excluded by {}", dependency, rule);
            return None;
        }
        let component = self.manifest.find_component(dependency);
        if component.is_none() {
            tracing::debug!("{} not found in the repository", dependency);
        }
        component
    }
}

impl DependencyResolver for RepositoryResolver {
    fn resolve(&self, request: &ResolutionRequest) -> Result<Vec<ResolvedDependency>> {
        let mut path = Vec::new();
        Ok(request
            .dependencies
            .iter()
            .filter_map(|dependency| self.select(dependency, &request.exclusions))
            .map(|component| self.build(component, request, &mut path))
            .collect())
    }
}

impl ExtensionMetadataSource for RepositoryResolver {
    fn extension_for(&self, artifact: &ArtifactCoords) -> Result<Option<ExtensionDescriptor>> {
        Ok(self.descriptors.get(artifact).cloned())
    }
}

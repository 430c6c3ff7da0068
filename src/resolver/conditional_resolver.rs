//! Resolution of a single conditional dependency.
//!
//! The dependency is aligned with the platform, resolved non-transitively and,
//! when that yields nothing, resolved transitively to follow a pom relocation.
//! A dependency that still resolves to nothing is either excluded by the
//! platform (dropped) or unresolvable (fatal for the run).

use anyhow::Result;

use super::extension_registry::ExtensionRegistry;
use super::{DependencyResolver, ResolutionRequest};
use crate::core::ExtdepError;
use crate::metadata::ExtensionMetadataSource;
use crate::models::{ArtifactCoords, ArtifactKey, DependencyRef, ResolvedDependency};
use crate::platform::PlatformConstraints;

/// Classification of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Resolved {
        /// The dependency actually requested (platform version applied)
        dependency: DependencyRef,
        artifact: ArtifactCoords,
        /// Extension id when the artifact is an extension
        extension: Option<ArtifactKey>,
    },
    /// Nothing resolved and an exclusion rule covers the dependency
    Excluded {
        dependency: DependencyRef,
    },
    /// Nothing resolved and no exclusion rule applies
    Unresolvable {
        dependency: DependencyRef,
    },
}

pub struct ConditionalDependencyResolver<'a> {
    resolver: &'a dyn DependencyResolver,
    metadata: &'a dyn ExtensionMetadataSource,
    platform: &'a dyn PlatformConstraints,
}

impl<'a> ConditionalDependencyResolver<'a> {
    pub fn new(
        resolver: &'a dyn DependencyResolver,
        metadata: &'a dyn ExtensionMetadataSource,
        platform: &'a dyn PlatformConstraints,
    ) -> Self {
        Self {
            resolver,
            metadata,
            platform,
        }
    }

    /// Resolve `dependency` and classify the result.
    ///
    /// # Errors
    /// Failures of the underlying resolver or metadata source, and
    /// [`ExtdepError::ResolverFailure`] when an unconstrained dependency
    /// resolves to more than one artifact.
    pub fn resolve(
        &self,
        dependency: &DependencyRef,
        registry: &mut ExtensionRegistry,
    ) -> Result<ResolutionOutcome> {
        let (dependency, constrained) = self.constrain(dependency);
        let request = ResolutionRequest::new(
            vec![dependency.clone()],
            self.platform.exclusion_rules().to_vec(),
            false,
        );
        let resolved = self.run(&request)?;

        let artifacts: Vec<&ArtifactCoords> =
            resolved.iter().flat_map(|dep| dep.artifacts.iter().map(|a| &a.coords)).collect();
        let artifact = match artifacts.as_slice() {
            [] => self.resolve_relocation(&dependency)?,
            [single] => Some((*single).clone()),
            [first, ..] if constrained => {
                tracing::debug!(
                    "{} resolved to {} artifacts, using {}",
                    dependency,
                    artifacts.len(),
                    first
                );
                Some((*first).clone())
            }
            many => {
                return Err(ExtdepError::ResolverFailure {
                    request: request.to_string(),
                    reason: format!("resolved to {} artifacts, expected exactly one", many.len()),
                }
                .into());
            }
        };

        let Some(artifact) = artifact else {
            if self.platform.is_excluded(&dependency) {
                return Ok(ResolutionOutcome::Excluded {
                    dependency,
                });
            }
            return Ok(ResolutionOutcome::Unresolvable {
                dependency,
            });
        };

        let extension = registry.lookup(self.metadata, &artifact)?;
        tracing::debug!("Resolved conditional dependency {} to {}", dependency, artifact);
        Ok(ResolutionOutcome::Resolved {
            dependency,
            artifact,
            extension,
        })
    }

    /// Resolve `artifact` with its transitive dependencies.
    pub fn resolve_transitive(&self, artifact: &ArtifactCoords) -> Result<Vec<ResolvedDependency>> {
        let request = ResolutionRequest::new(
            vec![DependencyRef::from(artifact)],
            self.platform.exclusion_rules().to_vec(),
            true,
        );
        self.run(&request)
    }

    /// Apply the platform constraint, if any. The platform version wins.
    fn constrain(&self, dependency: &DependencyRef) -> (DependencyRef, bool) {
        match self.platform.find_constraint(&dependency.group_id, &dependency.artifact_id) {
            Some(version) => (dependency.with_version(version), true),
            None => (dependency.clone(), false),
        }
    }

    /// Follow a pom relocation: exactly one first-level dependency with exactly
    /// one child carrying exactly one non-pom artifact.
    fn resolve_relocation(&self, dependency: &DependencyRef) -> Result<Option<ArtifactCoords>> {
        let request = ResolutionRequest::new(
            vec![dependency.clone()],
            self.platform.exclusion_rules().to_vec(),
            true,
        );
        let resolved = self.run(&request)?;

        let [relocated] = resolved.as_slice() else {
            return Ok(None);
        };
        let [target] = relocated.children.as_slice() else {
            return Ok(None);
        };
        let [artifact] = target.artifacts.as_slice() else {
            return Ok(None);
        };
        if artifact.coords.is_pom() {
            return Ok(None);
        }

        tracing::debug!("{} is relocated to {}", dependency, artifact.coords);
        Ok(Some(artifact.coords.clone()))
    }

    fn run(&self, request: &ResolutionRequest) -> Result<Vec<ResolvedDependency>> {
        self.resolver.resolve(request).map_err(|e| {
            ExtdepError::ResolverFailure {
                request: request.to_string(),
                reason: format!("{e:#}"),
            }
            .into()
        })
    }
}

//! Registry of the extensions discovered during one resolution run.

use anyhow::Result;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::artifact_graph::ArtifactGraph;
use crate::core::ExtdepError;
use crate::metadata::{ExtensionDescriptor, ExtensionMetadataSource};
use crate::models::{ArtifactCoords, ArtifactKey, DependencyRef, LaunchMode};

/// An extension known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extension {
    /// Key of the runtime artifact
    pub id: ArtifactKey,
    pub runtime: ArtifactCoords,
    pub deployment: ArtifactCoords,
    pub conditional_dependencies: Vec<DependencyRef>,
    pub conditional_dev_dependencies: Vec<DependencyRef>,
    pub dependency_conditions: BTreeSet<ArtifactKey>,
    /// Arrived through conditional resolution
    pub conditional: bool,
}

impl Extension {
    /// Conditional dependencies that apply in `mode`, in declaration order.
    pub fn conditional_dependencies_for(
        &self,
        mode: LaunchMode,
    ) -> impl Iterator<Item = &DependencyRef> {
        let dev: &[DependencyRef] = if mode.is_development() {
            &self.conditional_dev_dependencies
        } else {
            &[]
        };
        self.conditional_dependencies.iter().chain(dev.iter())
    }

    /// Every dependency condition is already in the graph.
    pub fn conditions_satisfied(&self, graph: &ArtifactGraph) -> bool {
        self.dependency_conditions.iter().all(|key| graph.contains(key))
    }

    /// `group:artifact` of the runtime module.
    pub fn module_name(&self) -> String {
        self.id.module_name()
    }

    /// `group:artifact` of the deployment module.
    pub fn deployment_module_name(&self) -> String {
        self.deployment.key.module_name()
    }
}

impl From<ExtensionDescriptor> for Extension {
    fn from(descriptor: ExtensionDescriptor) -> Self {
        Self {
            id: descriptor.runtime.key.clone(),
            runtime: descriptor.runtime,
            deployment: descriptor.deployment,
            conditional_dependencies: descriptor.conditional_dependencies,
            conditional_dev_dependencies: descriptor.conditional_dev_dependencies,
            dependency_conditions: descriptor.dependency_conditions.into_iter().collect(),
            conditional: false,
        }
    }
}

/// Extensions keyed by id, with lookups cached per artifact coordinates.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    extensions: BTreeMap<ArtifactKey, Extension>,
    lookups: HashMap<ArtifactCoords, Option<ArtifactKey>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up (once) whether `artifact` is an extension and register it.
    pub fn lookup(
        &mut self,
        metadata: &dyn ExtensionMetadataSource,
        artifact: &ArtifactCoords,
    ) -> Result<Option<ArtifactKey>> {
        if let Some(cached) = self.lookups.get(artifact) {
            return Ok(cached.clone());
        }

        let descriptor = metadata.extension_for(artifact).map_err(|e| {
            // Typed failures (e.g. a malformed descriptor) keep their kind.
            if e.chain().any(|cause| cause.is::<ExtdepError>()) {
                e.context(format!("Failed to look up extension metadata of {artifact}"))
            } else {
                ExtdepError::MetadataLookupFailed {
                    artifact: artifact.to_string(),
                    reason: format!("{e:#}"),
                }
                .into()
            }
        })?;
        let id = descriptor.map(|descriptor| self.register(descriptor.into()));
        if let Some(id) = &id {
            tracing::debug!("{} is an extension", id);
        }
        self.lookups.insert(artifact.clone(), id.clone());
        Ok(id)
    }

    /// Register an extension; an already registered id keeps its first descriptor.
    pub fn register(&mut self, extension: Extension) -> ArtifactKey {
        let id = extension.id.clone();
        self.extensions.entry(id.clone()).or_insert(extension);
        id
    }

    pub fn get(&self, id: &ArtifactKey) -> Option<&Extension> {
        self.extensions.get(id)
    }

    pub fn mark_conditional(&mut self, id: &ArtifactKey) {
        if let Some(extension) = self.extensions.get_mut(id) {
            extension.conditional = true;
        }
    }

    /// Extensions sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.values()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Keep only extensions whose runtime artifact ended up in `graph`.
    pub fn retain_present(&mut self, graph: &ArtifactGraph) {
        self.extensions.retain(|id, _| graph.contains(id));
    }
}

//! Deployment dependencies derived from the final graph.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::artifact_graph::ArtifactGraph;
use super::extension_registry::ExtensionRegistry;
use super::types::SatisfiedConditional;
use crate::models::{ArtifactCoords, ArtifactKey};

/// Deployment artifact contributed by one extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentDependency {
    /// Extension id (runtime artifact key)
    pub extension: ArtifactKey,
    pub coords: ArtifactCoords,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeploymentDependencies {
    /// Deployment artifacts of extensions pulled in by workspace modules
    pub direct: Vec<DeploymentDependency>,
    /// Deployment artifacts of conditionally enabled extensions, keyed by the
    /// deployment module (`group:artifact`) of the extension that requested them
    pub conditional: BTreeMap<String, Vec<DeploymentDependency>>,
}

impl DeploymentDependencies {
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.conditional.is_empty()
    }

    /// Every deployment coordinate, direct ones first.
    pub fn all_coords(&self) -> Vec<&ArtifactCoords> {
        self.direct
            .iter()
            .chain(self.conditional.values().flatten())
            .map(|dep| &dep.coords)
            .collect()
    }
}

pub struct DeploymentDependencyCollector;

impl DeploymentDependencyCollector {
    /// Compute deployment dependencies for a graph at its fixed point.
    ///
    /// An extension node contributes a direct deployment dependency when its
    /// parent is a local artifact, unless the deployment artifact is already a
    /// runtime dependency. Each extension contributes at most once.
    pub fn collect(
        graph: &ArtifactGraph,
        extensions: &ExtensionRegistry,
        satisfied: &BTreeMap<ArtifactKey, Vec<SatisfiedConditional>>,
    ) -> DeploymentDependencies {
        let mut result = DeploymentDependencies::default();
        let mut emitted = HashSet::new();

        for (index, node) in graph.nodes() {
            let Some(extension_id) = &node.extension else {
                continue;
            };
            let Some(parent) = graph.parent(index) else {
                continue;
            };
            if !parent.local {
                continue;
            }
            let Some(extension) = extensions.get(extension_id) else {
                continue;
            };
            if Self::already_present(graph, &extension.deployment) {
                tracing::debug!(
                    "Deployment artifact {} of {} is already a runtime dependency",
                    extension.deployment,
                    extension_id
                );
                continue;
            }
            if emitted.insert(extension_id.clone()) {
                result.direct.push(DeploymentDependency {
                    extension: extension_id.clone(),
                    coords: extension.deployment.clone(),
                });
            }
        }

        for (requester_id, dependencies) in satisfied {
            let Some(requester) = extensions.get(requester_id) else {
                continue;
            };
            let parent_module = requester.deployment_module_name();
            for extension_id in dependencies.iter().filter_map(|dep| dep.extension.as_ref()) {
                let Some(extension) = extensions.get(extension_id) else {
                    continue;
                };
                if Self::already_present(graph, &extension.deployment) {
                    continue;
                }
                let entries = result.conditional.entry(parent_module.clone()).or_default();
                if entries.iter().all(|entry| entry.extension != *extension_id) {
                    entries.push(DeploymentDependency {
                        extension: extension_id.clone(),
                        coords: extension.deployment.clone(),
                    });
                }
            }
        }

        result
    }

    fn already_present(graph: &ArtifactGraph, deployment: &ArtifactCoords) -> bool {
        graph.contains(&ArtifactKey::ga(deployment.group_id(), deployment.artifact_id()))
    }
}

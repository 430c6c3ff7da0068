//! Build-tool variant declarations for resolved conditional and deployment sets.
//!
//! The build tool makes extra dependencies selectable through component
//! variants guarded by attributes. Each requesting extension module gets a
//! conditional variant listing its satisfied conditional dependencies. Each
//! module that needs deployment artifacts gets one deployment variant: a local
//! parent lists the deployment artifacts of the extensions it depends on, and
//! an extension's deployment module lists those of the conditional extensions
//! it requested.

use serde::Serialize;
use std::collections::BTreeMap;

use super::ResolvedApplication;
use crate::constants::VARIANT_ATTRIBUTE_VALUE;
use crate::models::{ArtifactCoords, LaunchMode};

/// A variant added to one component (module).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentVariant {
    /// `group:artifact` of the component receiving the variant
    pub module: String,
    /// Attribute selecting the variant
    pub attribute: String,
    /// Dependencies the variant adds, unique by group and artifact
    pub dependencies: Vec<ArtifactCoords>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantDeclarations {
    /// Resolvable configuration with conditional dependencies enabled
    pub configuration_name: String,
    pub conditional_attribute: String,
    pub deployment_attribute: String,
    pub attribute_value: String,
    pub conditional_variants: Vec<ComponentVariant>,
    pub deployment_variants: Vec<ComponentVariant>,
}

pub struct VariantAttributeAssigner;

impl VariantAttributeAssigner {
    pub fn configuration_name(mode: LaunchMode) -> String {
        format!("quarkusConditional{}RuntimeClasspath", mode.alias())
    }

    pub fn conditional_attribute(project_name: &str, mode: LaunchMode) -> String {
        format!("quarkus.{}.conditional-dependency.{}", mode.default_profile(), project_name)
    }

    pub fn deployment_attribute(project_name: &str, mode: LaunchMode) -> String {
        format!("quarkus.{}.deployment-dependency.{}", mode.default_profile(), project_name)
    }

    /// Translate a resolved application into variant declarations.
    pub fn assign(
        project_name: &str,
        mode: LaunchMode,
        application: &ResolvedApplication,
    ) -> VariantDeclarations {
        let conditional_attribute = Self::conditional_attribute(project_name, mode);
        let deployment_attribute = Self::deployment_attribute(project_name, mode);

        let conditional_variants = application
            .satisfied
            .iter()
            .map(|(requester, satisfied)| ComponentVariant {
                module: requester.module_name(),
                attribute: conditional_attribute.clone(),
                dependencies: unique_modules(satisfied.iter().map(|s| &s.artifact)),
            })
            .collect();

        let mut deployment_groups: BTreeMap<String, Vec<&ArtifactCoords>> = BTreeMap::new();
        for direct in &application.deployment.direct {
            let Some(index) = application.graph.find(&direct.extension) else {
                continue;
            };
            let Some(parent) = application.graph.parent(index) else {
                continue;
            };
            deployment_groups.entry(parent.key.module_name()).or_default().push(&direct.coords);
        }
        for (module, deployments) in &application.deployment.conditional {
            deployment_groups
                .entry(module.clone())
                .or_default()
                .extend(deployments.iter().map(|d| &d.coords));
        }

        let deployment_variants = deployment_groups
            .into_iter()
            .map(|(module, deployments)| ComponentVariant {
                module,
                attribute: deployment_attribute.clone(),
                dependencies: unique_modules(deployments.into_iter()),
            })
            .collect();

        VariantDeclarations {
            configuration_name: Self::configuration_name(mode),
            conditional_attribute,
            deployment_attribute,
            attribute_value: VARIANT_ATTRIBUTE_VALUE.to_string(),
            conditional_variants,
            deployment_variants,
        }
    }
}

fn unique_modules<'c>(coords: impl Iterator<Item = &'c ArtifactCoords>) -> Vec<ArtifactCoords> {
    let mut result: Vec<ArtifactCoords> = Vec::new();
    for coords in coords {
        let duplicate = result
            .iter()
            .any(|added| added.key.same_module(coords.group_id(), coords.artifact_id()));
        if !duplicate {
            result.push(coords.clone());
        }
    }
    result
}

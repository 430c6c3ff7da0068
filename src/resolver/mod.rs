//! Conditional and deployment dependency resolution.
//!
//! This module turns the resolved runtime dependencies of an application into
//! the augmented dependency set the build needs: conditional dependencies
//! declared by extensions are enabled once their conditions hold, and the
//! deployment (build-time) counterparts of the extensions are derived.
//!
//! # Architecture Overview
//!
//! Components, leaves first:
//!
//! - [`ArtifactGraph`]: arena of artifact nodes keyed by [`ArtifactKey`], with
//!   parent links, a flag bitset and the extension id of each node.
//! - [`ExtensionRegistry`]: extensions discovered so far, looked up lazily
//!   through an [`ExtensionMetadataSource`] and cached per artifact.
//! - [`ConditionalDependencyResolver`]: resolves one conditional dependency
//!   through the external [`DependencyResolver`], applying platform
//!   constraints, exclusion rules and pom relocations.
//! - [`FixedPointGraphWalker`]: collects extensions from the base graph and
//!   iterates over pending conditional dependencies until a fixed point.
//! - [`DeploymentDependencyCollector`]: derives deployment dependencies from
//!   the final graph.
//! - [`VariantAttributeAssigner`]: expresses both results as build-tool
//!   variant declarations.
//!
//! [`ApplicationResolver`] wires them together.
//!
//! # Concurrency
//!
//! A run is single-threaded and synchronous. Calls into the external resolver
//! may block; they happen one at a time because each pass reads graph state
//! written by the previous call.
//!
//! # Example
//!
//! ```rust,no_run
//! use extdep_cli::manifest::{Manifest, RepositoryResolver};
//! use extdep_cli::resolver::{ApplicationResolver, ResolverOptions};
//!
//! # fn example(manifest: Manifest) -> anyhow::Result<()> {
//! let repository = RepositoryResolver::new(&manifest)?;
//! let base = repository.base_configuration()?;
//! let resolver = ApplicationResolver::new(
//!     &repository,
//!     &repository,
//!     &manifest.platform,
//!     ResolverOptions::default(),
//! );
//! let application = resolver.resolve(&base)?;
//! for dep in &application.deployment.direct {
//!     println!("{}", dep.coords);
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifact_graph;
pub mod conditional_resolver;
pub mod deployment_collector;
pub mod extension_registry;
pub mod fixed_point;
pub mod types;
pub mod variants;


pub use artifact_graph::{ArtifactGraph, ArtifactNode, NodeFlags, TreeEntry};
pub use conditional_resolver::{ConditionalDependencyResolver, ResolutionOutcome};
pub use deployment_collector::{
    DeploymentDependencies, DeploymentDependency, DeploymentDependencyCollector,
};
pub use extension_registry::{Extension, ExtensionRegistry};
pub use fixed_point::{FixedPointGraphWalker, WalkResult};
pub use types::{
    PendingConditional, ResolverOptions, SatisfiedConditional, TerminationReason, WalkIteration,
};
pub use variants::{ComponentVariant, VariantAttributeAssigner, VariantDeclarations};

use anyhow::Result;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::metadata::ExtensionMetadataSource;
use crate::models::{ArtifactKey, DependencyRef, ResolvedDependency};
use crate::platform::{ExclusionRule, PlatformConstraints};

/// A request to the external dependency resolver.
#[derive(Debug, Clone)]
pub struct ResolutionRequest {
    pub dependencies: Vec<DependencyRef>,
    /// Exclusion rules applied to the whole resolution
    pub exclusions: Vec<ExclusionRule>,
    /// Resolve children too
    pub transitive: bool,
}

impl ResolutionRequest {
    pub fn new(
        dependencies: Vec<DependencyRef>,
        exclusions: Vec<ExclusionRule>,
        transitive: bool,
    ) -> Self {
        Self {
            dependencies,
            exclusions,
            transitive,
        }
    }
}

impl fmt::Display for ResolutionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deps: Vec<String> = self.dependencies.iter().map(ToString::to_string).collect();
        write!(f, "{}", deps.join(", "))?;
        if !self.transitive {
            write!(f, " (non-transitive)")?;
        }
        Ok(())
    }
}

/// The build tool's dependency resolver.
///
/// Returns the first-level resolved dependencies of the request, each with its
/// artifacts and (for transitive requests) its resolved children. A module that
/// does not exist resolves to nothing; `Err` is reserved for resolver failures.
pub trait DependencyResolver {
    fn resolve(&self, request: &ResolutionRequest) -> Result<Vec<ResolvedDependency>>;
}

impl<T: DependencyResolver + ?Sized> DependencyResolver for &T {
    fn resolve(&self, request: &ResolutionRequest) -> Result<Vec<ResolvedDependency>> {
        (**self).resolve(request)
    }
}

/// Result of resolving an application.
#[derive(Debug, Clone)]
pub struct ResolvedApplication {
    pub graph: ArtifactGraph,
    pub extensions: ExtensionRegistry,
    /// Satisfied conditionals keyed by requesting extension id
    pub satisfied: BTreeMap<ArtifactKey, Vec<SatisfiedConditional>>,
    pub unsatisfied: Vec<PendingConditional>,
    pub excluded: Vec<DependencyRef>,
    pub deployment: DeploymentDependencies,
    /// Fixed-point passes run
    pub iterations: usize,
    pub termination: TerminationReason,
    pub history: Vec<WalkIteration>,
}

impl ResolvedApplication {
    /// Satisfied conditionals of all extensions, without duplicates.
    pub fn conditional_artifacts(&self) -> Vec<&SatisfiedConditional> {
        let mut seen = HashSet::new();
        self.satisfied
            .values()
            .flatten()
            .filter(|satisfied| seen.insert(satisfied.artifact.key.clone()))
            .collect()
    }
}

/// Runs the fixed-point walk and the deployment collection.
pub struct ApplicationResolver<'a> {
    resolver: &'a dyn DependencyResolver,
    metadata: &'a dyn ExtensionMetadataSource,
    platform: &'a dyn PlatformConstraints,
    options: ResolverOptions,
}

impl<'a> ApplicationResolver<'a> {
    pub fn new(
        resolver: &'a dyn DependencyResolver,
        metadata: &'a dyn ExtensionMetadataSource,
        platform: &'a dyn PlatformConstraints,
        options: ResolverOptions,
    ) -> Self {
        Self {
            resolver,
            metadata,
            platform,
            options,
        }
    }

    /// Resolve the application rooted at the `base` first-level dependencies.
    pub fn resolve(&self, base: &[ResolvedDependency]) -> Result<ResolvedApplication> {
        let conditional =
            ConditionalDependencyResolver::new(self.resolver, self.metadata, self.platform);
        let mut walker = FixedPointGraphWalker::new(conditional, self.metadata, self.options);
        let mut walk = walker.walk(base)?;
        walk.extensions.retain_present(&walk.graph);

        let deployment =
            DeploymentDependencyCollector::collect(&walk.graph, &walk.extensions, &walk.satisfied);

        tracing::info!(
            "Resolved {} artifact(s), {} extension(s), {} conditional, {} deployment dependency(ies)",
            walk.graph.len(),
            walk.extensions.len(),
            walk.satisfied.values().map(Vec::len).sum::<usize>(),
            deployment.direct.len()
        );

        Ok(ResolvedApplication {
            graph: walk.graph,
            extensions: walk.extensions,
            satisfied: walk.satisfied,
            unsatisfied: walk.unsatisfied,
            excluded: walk.excluded,
            deployment,
            iterations: walk.iterations,
            termination: walk.termination,
            history: walk.history,
        })
    }
}

//! Fixed-point walk that enables conditional dependencies.
//!
//! # Algorithm
//!
//! 1. **Collect**: walk the base dependency trees depth-first, adding every
//!    artifact to the graph. The first extension found on a root-to-node path
//!    is flagged as a top-level runtime extension; extensions below it are not.
//!    Every newly discovered extension queues its conditional dependencies.
//! 2. **Pass**: go over a snapshot of the pending conditionals. Each one is
//!    resolved at most once. A resolved dependency whose own dependency
//!    conditions hold is added to the graph together with its transitive
//!    dependencies, which may discover further extensions and queue more
//!    conditionals. Excluded dependencies are dropped; unresolvable ones abort.
//! 3. **Repeat** until nothing is pending, a pass makes no progress, or the
//!    iteration bound is reached.

use anyhow::Result;
use petgraph::graph::NodeIndex;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::artifact_graph::{ArtifactGraph, NodeFlags};
use super::conditional_resolver::{ConditionalDependencyResolver, ResolutionOutcome};
use super::extension_registry::ExtensionRegistry;
use super::types::{
    PendingConditional, ResolverOptions, SatisfiedConditional, TerminationReason, WalkIteration,
};
use crate::core::ExtdepError;
use crate::metadata::ExtensionMetadataSource;
use crate::models::{ArtifactKey, DependencyRef, ModuleVersion, ResolvedDependency};

/// Everything the walk produced.
#[derive(Debug, Clone)]
pub struct WalkResult {
    pub graph: ArtifactGraph,
    pub extensions: ExtensionRegistry,
    /// Satisfied conditionals keyed by requesting extension id
    pub satisfied: BTreeMap<ArtifactKey, Vec<SatisfiedConditional>>,
    /// Still pending at the fixed point
    pub unsatisfied: Vec<PendingConditional>,
    pub excluded: Vec<DependencyRef>,
    pub iterations: usize,
    pub termination: TerminationReason,
    pub history: Vec<WalkIteration>,
}

pub struct FixedPointGraphWalker<'a> {
    resolver: ConditionalDependencyResolver<'a>,
    metadata: &'a dyn ExtensionMetadataSource,
    options: ResolverOptions,

    graph: ArtifactGraph,
    registry: ExtensionRegistry,
    /// Pending conditionals in request order
    pending: Vec<PendingConditional>,
    /// Resolution outcomes by dependency key, so nothing is resolved twice
    outcomes: HashMap<ArtifactKey, ResolutionOutcome>,
    satisfied: BTreeMap<ArtifactKey, Vec<SatisfiedConditional>>,
    excluded: Vec<DependencyRef>,
    history: Vec<WalkIteration>,
}

impl<'a> FixedPointGraphWalker<'a> {
    pub fn new(
        resolver: ConditionalDependencyResolver<'a>,
        metadata: &'a dyn ExtensionMetadataSource,
        options: ResolverOptions,
    ) -> Self {
        Self {
            resolver,
            metadata,
            options,
            graph: ArtifactGraph::new(),
            registry: ExtensionRegistry::new(),
            pending: Vec::new(),
            outcomes: HashMap::new(),
            satisfied: BTreeMap::new(),
            excluded: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Run the walk over the first-level dependencies of the base configuration.
    ///
    /// # Errors
    /// [`ExtdepError::UnresolvableDependency`] when a conditional dependency
    /// resolves to nothing and is not excluded, plus any resolver or metadata
    /// failure. No partial result is returned.
    pub fn walk(&mut self, base: &[ResolvedDependency]) -> Result<WalkResult> {
        self.graph.reset();
        self.pending.clear();
        self.outcomes.clear();
        self.satisfied.clear();
        self.excluded.clear();
        self.history.clear();

        tracing::debug!(
            "Collecting extensions from {} first-level dependency(ies), mode {}",
            base.len(),
            self.options.launch_mode
        );
        let mut seen = HashSet::new();
        for dependency in base {
            self.visit(None, dependency, true, &mut seen)?;
        }

        let mut iteration = 0;
        let termination = loop {
            if self.pending.is_empty() {
                break TerminationReason::Exhausted;
            }
            if iteration >= self.options.max_iterations {
                tracing::warn!(
                    "Reached max iterations ({}) with {} conditional dependency(ies) pending",
                    self.options.max_iterations,
                    self.pending.len()
                );
                break TerminationReason::MaxIterations;
            }
            iteration += 1;

            tracing::debug!("=== Conditional dependency pass {} ===", iteration);
            tracing::debug!("Processing {} pending conditional(s)", self.pending.len());
            if !self.run_pass(iteration)? {
                tracing::debug!("No progress in pass {}", iteration);
                break TerminationReason::NoProgress;
            }
        };

        tracing::debug!(
            "Conditional resolution finished after {} pass(es): {:?}, {} artifact(s), {} pending",
            iteration,
            termination,
            self.graph.len(),
            self.pending.len()
        );
        Ok(self.build_result(iteration, termination))
    }

    /// Depth-first walk of one resolved dependency.
    ///
    /// `collect_top` is passed by value: finding an extension clears it for
    /// the remainder of this path only.
    fn visit(
        &mut self,
        parent: Option<NodeIndex>,
        dependency: &ResolvedDependency,
        mut collect_top: bool,
        seen: &mut HashSet<ModuleVersion>,
    ) -> Result<()> {
        if !seen.insert(dependency.module.clone()) {
            return Ok(());
        }

        let mut next_parent = parent;
        let mut descend = dependency.artifacts.is_empty();
        for artifact in &dependency.artifacts {
            let (index, created) = self.graph.upsert_node(&artifact.coords, dependency.local, parent);
            if created {
                self.discover(index)?;
            }
            descend |= self.graph.mark_visited(index);

            if collect_top && self.graph.node(index).is_extension() {
                self.graph.set_flag(index, NodeFlags::TOP_LEVEL_RUNTIME_EXTENSION_ARTIFACT);
                self.graph.set_parent(index, parent);
                collect_top = false;
            }
            next_parent = Some(index);
        }

        if !descend {
            return Ok(());
        }
        for child in &dependency.children {
            self.visit(next_parent, child, collect_top, seen)?;
        }
        Ok(())
    }

    /// One-time processing of a newly created node.
    fn discover(&mut self, index: NodeIndex) -> Result<()> {
        let coords = self.graph.node(index).coords.clone();
        let extension = self.registry.lookup(self.metadata, &coords)?;
        self.graph.set_extension(index, extension.clone());
        if let Some(id) = extension {
            self.enqueue_conditional_dependencies(&id);
        }
        Ok(())
    }

    fn enqueue_conditional_dependencies(&mut self, extension_id: &ArtifactKey) {
        let Some(extension) = self.registry.get(extension_id) else {
            return;
        };
        let dependencies: Vec<DependencyRef> =
            extension.conditional_dependencies_for(self.options.launch_mode).cloned().collect();

        for dependency in dependencies {
            let key = dependency.key();
            if self.graph.contains(&key) {
                tracing::debug!("{} is already present, not queued for {}", dependency, extension_id);
                continue;
            }
            if self.excluded.iter().any(|excluded| excluded.key() == key) {
                continue;
            }
            match self.pending.iter_mut().find(|pending| pending.key() == key) {
                Some(pending) => {
                    pending.add_requester(extension_id);
                }
                None => {
                    tracing::debug!("Queued conditional dependency {} of {}", dependency, extension_id);
                    let mut pending = PendingConditional::new(dependency);
                    pending.add_requester(extension_id);
                    self.pending.push(pending);
                }
            }
        }
    }

    /// One pass over a snapshot of the pending set. Returns whether it shrank.
    fn run_pass(&mut self, iteration: usize) -> Result<bool> {
        let snapshot: Vec<ArtifactKey> = self.pending.iter().map(PendingConditional::key).collect();
        let mut record = WalkIteration {
            iteration,
            pending: snapshot.len(),
            satisfied: Vec::new(),
            excluded: Vec::new(),
            made_progress: false,
        };

        for key in snapshot {
            let Some(position) = self.pending.iter().position(|pending| pending.key() == key)
            else {
                continue;
            };

            if let Some(node) = self.graph.get(&key) {
                let satisfied = SatisfiedConditional {
                    dependency: self.pending[position].dependency.clone(),
                    artifact: node.coords.clone(),
                    extension: node.extension.clone(),
                };
                let pending = self.pending.remove(position);
                tracing::debug!("{} was added meanwhile, dropping it", pending.dependency);
                record.satisfied.push(satisfied.dependency.clone());
                for requester in &pending.requested_by {
                    self.satisfied.entry(requester.clone()).or_default().push(satisfied.clone());
                }
                record.made_progress = true;
                continue;
            }

            let dependency = self.pending[position].dependency.clone();
            match self.outcome_for(&key, &dependency)? {
                ResolutionOutcome::Unresolvable {
                    dependency,
                } => {
                    let requested_by =
                        self.pending[position].requested_by.iter().map(ToString::to_string).collect();
                    return Err(ExtdepError::UnresolvableDependency {
                        coords: dependency.to_string(),
                        requested_by,
                    }
                    .into());
                }
                ResolutionOutcome::Excluded {
                    dependency,
                } => {
                    self.pending.remove(position);
                    tracing::info!(
                        "Conditional dependency {} ignored due to exclusion rule",
                        dependency
                    );
                    record.excluded.push(dependency.clone());
                    self.excluded.push(dependency);
                    record.made_progress = true;
                }
                ResolutionOutcome::Resolved {
                    dependency,
                    artifact,
                    extension,
                } => {
                    let ready = extension
                        .as_ref()
                        .and_then(|id| self.registry.get(id))
                        .is_none_or(|ext| ext.conditions_satisfied(&self.graph));
                    if !ready {
                        tracing::debug!("Conditions of {} not satisfied yet", artifact);
                        continue;
                    }

                    let pending = self.pending.remove(position);
                    let satisfied = SatisfiedConditional {
                        dependency,
                        artifact,
                        extension,
                    };
                    self.activate(&pending, &satisfied)?;
                    record.satisfied.push(satisfied.dependency.clone());
                    for requester in &pending.requested_by {
                        self.satisfied.entry(requester.clone()).or_default().push(satisfied.clone());
                    }
                    record.made_progress = true;
                }
            }
        }

        let made_progress = record.made_progress;
        self.history.push(record);
        Ok(made_progress)
    }

    /// Resolve once per key; later passes reuse the outcome.
    fn outcome_for(
        &mut self,
        key: &ArtifactKey,
        dependency: &DependencyRef,
    ) -> Result<ResolutionOutcome> {
        if let Some(outcome) = self.outcomes.get(key) {
            return Ok(outcome.clone());
        }
        let outcome = self.resolver.resolve(dependency, &mut self.registry)?;
        self.outcomes.insert(key.clone(), outcome.clone());
        Ok(outcome)
    }

    /// Add a satisfied conditional and its transitive dependencies to the graph.
    fn activate(
        &mut self,
        pending: &PendingConditional,
        satisfied: &SatisfiedConditional,
    ) -> Result<()> {
        let parent = pending.requested_by.iter().find_map(|id| self.graph.find(id));
        let (index, created) = self.graph.upsert_node(&satisfied.artifact, false, parent);
        self.graph.set_flag(index, NodeFlags::CONDITIONAL);
        if created {
            self.discover(index)?;
        }
        if let Some(id) = &satisfied.extension {
            self.registry.mark_conditional(id);
        }
        tracing::debug!(
            "Enabled conditional dependency {} requested by {}",
            satisfied.artifact,
            pending.requested_by.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        );

        if !self.graph.mark_visited(index) {
            return Ok(());
        }
        let resolved = self.resolver.resolve_transitive(&satisfied.artifact)?;
        let mut seen = HashSet::new();
        for first_level in &resolved {
            seen.insert(first_level.module.clone());
            for child in &first_level.children {
                self.visit(Some(index), child, false, &mut seen)?;
            }
        }
        Ok(())
    }

    fn build_result(&mut self, iterations: usize, termination: TerminationReason) -> WalkResult {
        WalkResult {
            graph: std::mem::take(&mut self.graph),
            extensions: std::mem::take(&mut self.registry),
            satisfied: std::mem::take(&mut self.satisfied),
            unsatisfied: std::mem::take(&mut self.pending),
            excluded: std::mem::take(&mut self.excluded),
            iterations,
            termination,
            history: std::mem::take(&mut self.history),
        }
    }
}

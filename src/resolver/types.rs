//! Public types for resolution results.

use serde::Serialize;

use crate::constants::DEFAULT_MAX_ITERATIONS;
use crate::models::{ArtifactCoords, ArtifactKey, DependencyRef, LaunchMode};

/// Options of one resolution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    pub launch_mode: LaunchMode,
    /// Upper bound on fixed-point passes
    pub max_iterations: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            launch_mode: LaunchMode::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// A conditional dependency waiting to be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingConditional {
    /// The dependency as first requested
    pub dependency: DependencyRef,
    /// Extension ids that declared it, in request order
    pub requested_by: Vec<ArtifactKey>,
}

impl PendingConditional {
    pub fn new(dependency: DependencyRef) -> Self {
        Self {
            dependency,
            requested_by: Vec::new(),
        }
    }

    /// Key the pending entry is tracked under.
    pub fn key(&self) -> ArtifactKey {
        self.dependency.key()
    }

    /// Add a requester, returning `false` if it was already recorded.
    pub fn add_requester(&mut self, extension: &ArtifactKey) -> bool {
        if self.requested_by.contains(extension) {
            return false;
        }
        self.requested_by.push(extension.clone());
        true
    }
}

/// A conditional dependency that was added to the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SatisfiedConditional {
    /// As requested, after platform alignment
    pub dependency: DependencyRef,
    /// The artifact it resolved to
    pub artifact: ArtifactCoords,
    /// Extension id when the artifact is itself an extension
    pub extension: Option<ArtifactKey>,
}

/// Reason the fixed-point loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminationReason {
    /// No conditional dependency is pending
    Exhausted,
    /// A full pass satisfied or dropped nothing
    NoProgress,
    /// Reached the iteration bound with dependencies still pending
    MaxIterations,
}

/// What happened in one pass over the pending conditionals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkIteration {
    /// Pass number (1-indexed)
    pub iteration: usize,
    /// Pending entries at the start of the pass
    pub pending: usize,
    pub satisfied: Vec<DependencyRef>,
    pub excluded: Vec<DependencyRef>,
    pub made_progress: bool,
}

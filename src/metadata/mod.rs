//! Extension metadata.
//!
//! An artifact is an extension when it ships a descriptor naming its
//! deployment artifact. This module defines the parsed form of that descriptor
//! ([`ExtensionDescriptor`]), the capability the resolver uses to look one up
//! ([`ExtensionMetadataSource`]) and the properties parser
//! ([`MetadataExtractor`]).

pub mod extractor;

pub use extractor::MetadataExtractor;

use anyhow::Result;
use serde::Serialize;

use crate::models::{ArtifactCoords, ArtifactKey, DependencyRef};

/// Parsed extension descriptor of one runtime artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionDescriptor {
    /// The runtime artifact carrying the descriptor
    pub runtime: ArtifactCoords,
    /// Build-time counterpart of the runtime artifact
    pub deployment: ArtifactCoords,
    /// Dependencies added when their own conditions hold
    pub conditional_dependencies: Vec<DependencyRef>,
    /// Like `conditional_dependencies`, development mode only
    pub conditional_dev_dependencies: Vec<DependencyRef>,
    /// Artifacts that must be present before this extension is enabled as
    /// someone else's conditional dependency
    pub dependency_conditions: Vec<ArtifactKey>,
}

impl ExtensionDescriptor {
    /// Descriptor with a deployment artifact and nothing conditional.
    pub fn new(runtime: ArtifactCoords, deployment: ArtifactCoords) -> Self {
        Self {
            runtime,
            deployment,
            conditional_dependencies: Vec::new(),
            conditional_dev_dependencies: Vec::new(),
            dependency_conditions: Vec::new(),
        }
    }

    pub fn has_conditional_dependencies(&self) -> bool {
        !self.conditional_dependencies.is_empty() || !self.conditional_dev_dependencies.is_empty()
    }
}

/// Looks up extension metadata for resolved artifacts.
///
/// Implementations inspect whatever the ecosystem provides (a descriptor
/// inside the jar, a manifest entry, a fixture). `Ok(None)` means the artifact
/// is not an extension; `Err` means the metadata exists but is unusable.
pub trait ExtensionMetadataSource {
    fn extension_for(&self, artifact: &ArtifactCoords) -> Result<Option<ExtensionDescriptor>>;
}

impl<T: ExtensionMetadataSource + ?Sized> ExtensionMetadataSource for &T {
    fn extension_for(&self, artifact: &ArtifactCoords) -> Result<Option<ExtensionDescriptor>> {
        (**self).extension_for(artifact)
    }
}

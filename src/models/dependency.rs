//! Unresolved dependency references and resolved dependency trees.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::artifact::{ArtifactCoords, ArtifactKey};
use crate::core::ExtdepError;

/// A dependency as declared in extension metadata, not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyRef {
    pub group_id: String,
    pub artifact_id: String,
    /// Requested version; `None` leaves the choice to the platform or resolver
    pub version: Option<String>,
}

impl DependencyRef {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version,
        }
    }

    /// Key of the main jar this reference points at.
    ///
    /// Used to test graph membership before a reference is queued.
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::ga(&self.group_id, &self.artifact_id)
    }

    /// Same reference with a different version.
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..self.clone()
        }
    }
}

impl From<&ArtifactCoords> for DependencyRef {
    fn from(coords: &ArtifactCoords) -> Self {
        Self::new(
            coords.group_id(),
            coords.artifact_id(),
            Some(coords.version.clone()),
        )
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        Ok(())
    }
}

impl FromStr for DependencyRef {
    type Err = ExtdepError;

    /// Accepts `group:artifact` or any [`ArtifactCoords`] form.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.split(':').count() == 2 {
            let key: ArtifactKey = trimmed.parse()?;
            return Ok(Self::new(key.group_id, key.artifact_id, None));
        }
        let coords: ArtifactCoords = trimmed.parse()?;
        Ok(Self::from(&coords))
    }
}

impl Serialize for DependencyRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DependencyRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Module identity of a resolved dependency (`group:name:version`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModuleVersion {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ModuleVersion {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl From<&ArtifactCoords> for ModuleVersion {
    fn from(coords: &ArtifactCoords) -> Self {
        Self::new(coords.group_id(), coords.artifact_id(), &coords.version)
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// One file produced by a resolved module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedArtifact {
    pub coords: ArtifactCoords,
}

impl ResolvedArtifact {
    pub fn new(coords: ArtifactCoords) -> Self {
        Self { coords }
    }
}

/// A node of the tree returned by a [`DependencyResolver`](crate::resolver::DependencyResolver).
///
/// Mirrors what build tools hand back after resolving a configuration: the
/// module, the artifacts it contributes (possibly none, e.g. for pom-only or
/// relocated modules) and its own resolved children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    pub module: ModuleVersion,
    /// Produced by a workspace module rather than fetched from a repository
    pub local: bool,
    pub artifacts: Vec<ResolvedArtifact>,
    pub children: Vec<ResolvedDependency>,
}

impl ResolvedDependency {
    /// A module with a single main jar and no children.
    pub fn jar(coords: ArtifactCoords) -> Self {
        Self {
            module: ModuleVersion::from(&coords),
            local: false,
            artifacts: vec![ResolvedArtifact::new(coords)],
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<ResolvedDependency>) -> Self {
        self.children = children;
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }

    /// Total number of dependencies in this subtree, including `self`.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_size).sum::<usize>()
    }
}

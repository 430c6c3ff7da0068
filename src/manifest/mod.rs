//! Workspace manifest (`extdep.toml`).
//!
//! The manifest stands in for the build tool: it declares the project, the
//! platform it is aligned with and every component (module) the resolver may
//! hand out, including inline or file-based extension descriptors.
//!
//! # Basic Structure
//!
//! ```toml
//! [project]
//! name = "my-app"
//! dependencies = ["io.quarkus:quarkus-rest:3.2.0"]
//!
//! [platform.constraints]
//! "io.quarkus:quarkus-jackson" = "3.2.1"
//!
//! [[platform.exclusions]]
//! group = "org.unwanted"
//!
//! [[component]]
//! coords = "io.quarkus:quarkus-rest:3.2.0"
//! dependencies = ["io.quarkus:quarkus-core:3.2.0"]
//!
//! [component.extension]
//! deployment-artifact = "io.quarkus:quarkus-rest-deployment:3.2.0"
//! conditional-dependencies = ["io.quarkus:quarkus-rest-jackson"]
//! dependency-condition = ["io.quarkus:quarkus-jackson"]
//! ```
//!
//! # Component Selection
//!
//! A reference without a version selects the first declared component with
//! the same group and artifact. A versioned reference needs an exact match.
//!
//! # Integration
//!
//! [`RepositoryResolver`] answers [`crate::resolver::DependencyResolver`] and
//! [`crate::metadata::ExtensionMetadataSource`] calls from a loaded manifest.

mod repository;

pub use repository::RepositoryResolver;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::constants::MANIFEST_FILE_NAME;
use crate::core::ExtdepError;
use crate::metadata::{ExtensionDescriptor, MetadataExtractor};
use crate::models::{ArtifactCoords, ArtifactKey, DependencyRef, ResolvedArtifact};
use crate::platform::PlatformSpec;

/// Parsed `extdep.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub project: ProjectSpec,
    #[serde(default)]
    pub platform: PlatformSpec,
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentSpec>,
    /// Directory of the manifest file, set by [`Manifest::load`]
    #[serde(skip)]
    pub manifest_dir: Option<PathBuf>,
}

/// The project being built. Its own artifact is the local root of the graph.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSpec {
    pub name: String,
    #[serde(default = "default_project_group")]
    pub group: String,
    #[serde(default = "default_project_version")]
    pub version: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,
}

fn default_project_group() -> String {
    "project".to_string()
}

fn default_project_version() -> String {
    "unspecified".to_string()
}

impl ProjectSpec {
    pub fn coords(&self) -> ArtifactCoords {
        ArtifactCoords::jar(&self.group, &self.name, &self.version)
    }
}

/// A module known to the manifest repository.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentSpec {
    pub coords: ArtifactCoords,
    /// Built by the workspace rather than fetched from a repository
    #[serde(default)]
    pub local: bool,
    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,
    /// Pom relocation target; a relocated component has no artifacts
    pub relocation: Option<DependencyRef>,
    /// Descriptor file, relative to the manifest directory
    pub descriptor: Option<PathBuf>,
    /// Inline descriptor
    pub extension: Option<ExtensionSpec>,
    /// Content of `descriptor`, read by [`Manifest::load`]
    #[serde(skip)]
    pub descriptor_content: Option<String>,
}

/// Inline extension descriptor, same keys as the properties form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ExtensionSpec {
    pub deployment_artifact: String,
    #[serde(default)]
    pub conditional_dependencies: Vec<DependencyRef>,
    #[serde(default)]
    pub conditional_dev_dependencies: Vec<DependencyRef>,
    #[serde(default)]
    pub dependency_condition: Vec<ArtifactKey>,
}

impl ComponentSpec {
    pub fn new(coords: ArtifactCoords) -> Self {
        Self {
            coords,
            local: false,
            dependencies: Vec::new(),
            relocation: None,
            descriptor: None,
            extension: None,
            descriptor_content: None,
        }
    }

    /// Artifacts the component contributes. Pom and relocated modules have none.
    pub fn artifacts(&self) -> Vec<ResolvedArtifact> {
        if self.relocation.is_some() || self.coords.is_pom() {
            return Vec::new();
        }
        vec![ResolvedArtifact::new(self.coords.clone())]
    }

    /// Whether `dependency` selects this component.
    pub fn matches(&self, dependency: &DependencyRef) -> bool {
        if !self.coords.key.same_module(&dependency.group_id, &dependency.artifact_id) {
            return false;
        }
        dependency.version.as_ref().is_none_or(|version| *version == self.coords.version)
    }

    /// The extension descriptor of this component, if it is an extension.
    ///
    /// # Errors
    /// [`ExtdepError::InvalidExtensionDescriptor`] for a malformed descriptor,
    /// [`ExtdepError::ManifestValidationError`] when a descriptor file was
    /// declared but never read.
    pub fn extension_descriptor(&self) -> Result<Option<ExtensionDescriptor>> {
        if let Some(spec) = &self.extension {
            let deployment =
                MetadataExtractor::deployment_coords(&self.coords, spec.deployment_artifact.trim())
                    .map_err(|e| ExtdepError::InvalidExtensionDescriptor {
                        artifact: self.coords.to_string(),
                        reason: format!("'deployment-artifact': {e}"),
                    })?;
            let mut descriptor = ExtensionDescriptor::new(self.coords.clone(), deployment);
            descriptor.conditional_dependencies = spec.conditional_dependencies.clone();
            descriptor.conditional_dev_dependencies = spec.conditional_dev_dependencies.clone();
            descriptor.dependency_conditions = spec.dependency_condition.clone();
            return Ok(Some(descriptor));
        }

        match (&self.descriptor, &self.descriptor_content) {
            (_, Some(content)) => MetadataExtractor::extract(&self.coords, content).map(Some),
            (Some(path), None) => Err(ExtdepError::ManifestValidationError {
                reason: format!(
                    "Descriptor '{}' of component '{}' was not loaded",
                    path.display(),
                    self.coords
                ),
            }
            .into()),
            (None, None) => Ok(None),
        }
    }
}

impl Manifest {
    /// An empty manifest for `project_name`.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project: ProjectSpec {
                name: project_name.into(),
                group: default_project_group(),
                version: default_project_version(),
                dependencies: Vec::new(),
            },
            platform: PlatformSpec::default(),
            components: Vec::new(),
            manifest_dir: None,
        }
    }

    /// Parse manifest content without reading descriptor files.
    pub fn parse(content: &str, file: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ExtdepError::ManifestParseError {
                file: file.to_string(),
                reason: e.to_string(),
            })
            .with_context(|| format!("Invalid TOML syntax in manifest file: {file}"))
    }

    /// Load and validate a manifest, reading its descriptor files.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read manifest file: {}", path.display()))?;
        let mut manifest = Self::parse(&content, &path.display().to_string())?;

        let dir = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        for component in &mut manifest.components {
            let Some(relative) = &component.descriptor else {
                continue;
            };
            let descriptor_path = dir.join(relative);
            let content = tokio::fs::read_to_string(&descriptor_path).await.with_context(|| {
                format!(
                    "Failed to read descriptor of {}: {}",
                    component.coords,
                    descriptor_path.display()
                )
            })?;
            component.descriptor_content = Some(content);
        }
        manifest.manifest_dir = Some(dir);

        manifest.validate()?;
        tracing::debug!(
            "Loaded manifest {} with {} component(s)",
            path.display(),
            manifest.components.len()
        );
        Ok(manifest)
    }

    /// Check component references and descriptor declarations.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| ExtdepError::ManifestValidationError {
            reason,
        };

        let mut seen = HashSet::new();
        for component in &self.components {
            if !seen.insert(&component.coords) {
                return Err(invalid(format!("Duplicate component '{}'", component.coords)).into());
            }
            if component.descriptor.is_some() && component.extension.is_some() {
                return Err(invalid(format!(
                    "Component '{}' declares both a descriptor file and an inline extension",
                    component.coords
                ))
                .into());
            }
        }

        let project = self.project.coords();
        let references = self
            .project
            .dependencies
            .iter()
            .map(|dependency| (&project, dependency))
            .chain(self.components.iter().flat_map(|component| {
                component
                    .dependencies
                    .iter()
                    .chain(component.relocation.iter())
                    .map(move |dependency| (&component.coords, dependency))
            }));
        for (owner, dependency) in references {
            if self.find_component(dependency).is_none() {
                return Err(invalid(format!(
                    "Unknown dependency '{dependency}' of '{owner}'"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// First component selected by `dependency`.
    pub fn find_component(&self, dependency: &DependencyRef) -> Option<&ComponentSpec> {
        self.components.iter().find(|component| component.matches(dependency))
    }

    pub fn with_dependency(mut self, dependency: DependencyRef) -> Self {
        self.project.dependencies.push(dependency);
        self
    }

    pub fn with_component(mut self, component: ComponentSpec) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_platform(mut self, platform: PlatformSpec) -> Self {
        self.platform = platform;
        self
    }
}

/// Find `extdep.toml` from the current directory upwards.
pub fn find_manifest() -> Result<PathBuf> {
    let current = std::env::current_dir()
        .context("Cannot determine current working directory")?;
    find_manifest_from(current)
}

/// Use `explicit_path` when given, otherwise search from the current directory.
pub fn find_manifest_with_optional(explicit_path: Option<PathBuf>) -> Result<PathBuf> {
    match explicit_path {
        Some(path) => {
            if path.exists() {
                Ok(path)
            } else {
                Err(ExtdepError::ManifestNotFound.into())
            }
        }
        None => find_manifest(),
    }
}

/// Find `extdep.toml` in `current` or one of its ancestors.
pub fn find_manifest_from(mut current: PathBuf) -> Result<PathBuf> {
    loop {
        let manifest_path = current.join(MANIFEST_FILE_NAME);
        if manifest_path.exists() {
            return Ok(manifest_path);
        }

        if !current.pop() {
            return Err(ExtdepError::ManifestNotFound.into());
        }
    }
}

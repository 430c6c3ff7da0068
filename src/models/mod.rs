//! Shared data models for dependency resolution
//!
//! This module provides the value types that flow between the build-tool
//! boundary, the extension metadata layer and the resolver: artifact identity
//! ([`ArtifactKey`]), full coordinates ([`ArtifactCoords`]), unresolved
//! dependency references ([`DependencyRef`]) and the resolved dependency trees
//! returned by a [`DependencyResolver`](crate::resolver::DependencyResolver).

mod artifact;
mod dependency;

pub use artifact::{ArtifactCoords, ArtifactKey, DEFAULT_CLASSIFIER, TYPE_JAR, TYPE_POM};
pub use dependency::{DependencyRef, ModuleVersion, ResolvedArtifact, ResolvedDependency};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Launch mode of the application being resolved.
///
/// Only [`LaunchMode::Development`] enables the `conditional-dev-dependencies`
/// of an extension.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Production build
    #[default]
    #[value(alias = "prod")]
    Normal,
    /// Dev mode
    #[value(alias = "dev")]
    Development,
    /// Test run
    Test,
}

impl LaunchMode {
    /// Configuration profile name (`prod`, `dev`, `test`).
    pub const fn default_profile(self) -> &'static str {
        match self {
            Self::Normal => "prod",
            Self::Development => "dev",
            Self::Test => "test",
        }
    }

    /// Capitalized alias used in build-tool configuration names.
    pub const fn alias(self) -> &'static str {
        match self {
            Self::Normal => "Prod",
            Self::Development => "Dev",
            Self::Test => "Test",
        }
    }

    /// Whether development-only conditional dependencies apply.
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Development => "development",
            Self::Test => "test",
        };
        f.write_str(name)
    }
}

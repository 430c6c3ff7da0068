//! extdep - conditional and deployment dependency resolution for framework extensions
//!
//! Extensions are runtime artifacts that carry a descriptor declaring a
//! build-time (deployment) counterpart and, optionally, conditional
//! dependencies: artifacts that join the application only when their own
//! dependency conditions are met by what is already on the classpath.
//!
//! # Architecture Overview
//!
//! Resolution happens in three stages:
//! 1. A base runtime graph is resolved from the project's declared dependencies
//! 2. Conditional dependencies are enabled in repeated passes until nothing
//!    changes or the pass limit is reached
//! 3. Deployment dependencies are derived from the final graph and grouped
//!    into build-tool variants
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface (`resolve`, `tree`, `descriptor`)
//! - [`config`] - Global configuration (`~/.extdep/config.toml`)
//! - [`core`] - Error types and user-facing error reporting
//! - [`manifest`] - The `extdep.toml` project manifest and its repository
//! - [`metadata`] - Extension descriptor parsing
//! - [`models`] - Artifact coordinates, dependency references, launch modes
//! - [`platform`] - Version constraints and exclusion rules
//! - [`resolver`] - The graph, the fixed-point walker and deployment collection
//!
//! # Manifest Format (extdep.toml)
//!
//! ```toml
//! [project]
//! name = "my-app"
//! dependencies = ["io.quarkus:quarkus-rest:3.2.0"]
//!
//! [platform]
//! constraints = { "io.quarkus:quarkus-rest-jackson" = "3.2.0" }
//!
//! [[component]]
//! coords = "io.quarkus:quarkus-rest:3.2.0"
//!
//! [component.extension]
//! deployment-artifact = "io.quarkus:quarkus-rest-deployment"
//! conditional-dependencies = ["io.quarkus:quarkus-rest-jackson"]
//!
//! [[component]]
//! coords = "io.quarkus:quarkus-rest-jackson:3.2.0"
//! ```
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use extdep_cli::manifest::{Manifest, RepositoryResolver};
//! use extdep_cli::resolver::{ApplicationResolver, ResolverOptions};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let manifest = Manifest::load(std::path::Path::new("extdep.toml")).await?;
//! let repository = RepositoryResolver::new(&manifest)?;
//! let base = repository.base_configuration()?;
//! let application = ApplicationResolver::new(
//!     &repository,
//!     &repository,
//!     &manifest.platform,
//!     ResolverOptions::default(),
//! )
//! .resolve(&base)?;
//! println!("{} deployment dependency(ies)", application.deployment.direct.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod manifest;
pub mod metadata;
pub mod models;
pub mod platform;
pub mod resolver;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

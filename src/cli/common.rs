//! Helpers shared by the resolving commands.

use anyhow::Result;
use clap::ValueEnum;
use std::path::PathBuf;

use crate::manifest::{Manifest, RepositoryResolver, find_manifest_with_optional};
use crate::resolver::{ApplicationResolver, ResolvedApplication, ResolverOptions};

/// Output format of the `resolve` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Locate and load the manifest.
pub async fn load_manifest(manifest_path: Option<PathBuf>) -> Result<Manifest> {
    let path = find_manifest_with_optional(manifest_path)?;
    Manifest::load(&path).await
}

/// Resolve the application described by `manifest`.
pub fn resolve_manifest(
    manifest: &Manifest,
    options: ResolverOptions,
) -> Result<ResolvedApplication> {
    let repository = RepositoryResolver::new(manifest)?;
    let base = repository.base_configuration()?;
    tracing::debug!(
        "Resolving {} ({} first-level dependency(ies)), mode {}, max {} pass(es)",
        manifest.project.name,
        manifest.project.dependencies.len(),
        options.launch_mode,
        options.max_iterations
    );
    ApplicationResolver::new(&repository, &repository, &manifest.platform, options).resolve(&base)
}

//! Parse and display an extension descriptor.
//!
//! Useful for checking what the resolver will read from an extension's
//! `META-INF/quarkus-extension.properties` before wiring it into a manifest.
//! Without a file argument that path is read from the current directory.
//!
//! # Examples
//!
//! ```bash
//! extdep descriptor
//! extdep descriptor quarkus-extension.properties --artifact io.quarkus:quarkus-rest:3.2.0
//! extdep descriptor quarkus-extension.properties --format json
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fmt::Display;
use std::path::PathBuf;

use super::common::OutputFormat;
use crate::constants::EXTENSION_DESCRIPTOR_PATH;
use crate::metadata::{ExtensionDescriptor, MetadataExtractor};
use crate::models::ArtifactCoords;

const UNSPECIFIED: &str = "unspecified";

#[derive(Args, Debug)]
pub struct DescriptorCommand {
    /// Descriptor file in properties format
    #[arg(default_value = EXTENSION_DESCRIPTOR_PATH)]
    file: PathBuf,

    /// Runtime artifact the descriptor belongs to (`group:artifact:version`)
    #[arg(long)]
    artifact: Option<ArtifactCoords>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl DescriptorCommand {
    pub async fn execute(self) -> Result<()> {
        let content = tokio::fs::read_to_string(&self.file)
            .await
            .with_context(|| format!("Failed to read descriptor: {}", self.file.display()))?;
        let runtime = self.runtime_coords();
        let descriptor = MetadataExtractor::extract(&runtime, &content)
            .with_context(|| format!("Failed to parse descriptor: {}", self.file.display()))?;

        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&descriptor)
                    .context("Failed to serialize descriptor")?;
                println!("{json}");
            }
            OutputFormat::Text => print!("{}", render_text(&descriptor)),
        }
        Ok(())
    }

    fn runtime_coords(&self) -> ArtifactCoords {
        if let Some(artifact) = &self.artifact {
            return artifact.clone();
        }
        let stem = self
            .file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNSPECIFIED.to_string());
        ArtifactCoords::jar(UNSPECIFIED, stem, UNSPECIFIED)
    }
}

fn render_text(descriptor: &ExtensionDescriptor) -> String {
    let mut out = format!(
        "{} {}\n  deployment: {}\n",
        "Extension".bold(),
        descriptor.runtime.to_string().cyan(),
        descriptor.deployment
    );
    push_list(&mut out, "conditional dependencies", &descriptor.conditional_dependencies);
    push_list(&mut out, "conditional dev dependencies", &descriptor.conditional_dev_dependencies);
    push_list(&mut out, "dependency conditions", &descriptor.dependency_conditions);
    out
}

fn push_list<T: Display>(out: &mut String, label: &str, items: &[T]) {
    if items.is_empty() {
        out.push_str(&format!("  {label}: {}\n", "(none)".dimmed()));
        return;
    }
    out.push_str(&format!("  {label}:\n"));
    for item in items {
        out.push_str(&format!("    - {item}\n"));
    }
}

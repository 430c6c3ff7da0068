//! Resolve conditional and deployment dependencies of the project.
//!
//! # Examples
//!
//! ```bash
//! extdep resolve
//! extdep resolve --mode dev --variants
//! extdep resolve --max-iterations 10 --format json
//! ```
//!
//! # Output Format
//!
//! ```text
//! my-app (normal): 1 pass(es), exhausted
//!
//! Conditional dependencies:
//!   io.quarkus:quarkus-rest
//!     + io.quarkus:quarkus-rest-jackson:3.2.0 (extension)
//!
//! Deployment dependencies:
//!   io.quarkus:quarkus-rest-deployment:3.2.0 (io.quarkus:quarkus-rest)
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::common::{OutputFormat, load_manifest, resolve_manifest};
use crate::config::GlobalConfig;
use crate::models::{ArtifactKey, DependencyRef, LaunchMode};
use crate::resolver::{
    DeploymentDependencies, PendingConditional, SatisfiedConditional, TerminationReason,
    VariantAttributeAssigner, VariantDeclarations,
};

#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Launch mode; `development` enables conditional dev dependencies
    #[arg(long, value_enum)]
    mode: Option<LaunchMode>,

    /// Upper bound on conditional dependency passes
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    max_iterations: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also print build-tool variant declarations
    #[arg(long)]
    variants: bool,
}

#[derive(Debug, Serialize)]
struct ResolveReport<'a> {
    project: &'a str,
    launch_mode: LaunchMode,
    iterations: usize,
    termination: TerminationReason,
    conditional: &'a BTreeMap<ArtifactKey, Vec<SatisfiedConditional>>,
    unsatisfied: &'a [PendingConditional],
    excluded: &'a [DependencyRef],
    deployment: &'a DeploymentDependencies,
    #[serde(skip_serializing_if = "Option::is_none")]
    variants: Option<VariantDeclarations>,
}

impl ResolveCommand {
    pub async fn execute(self, manifest_path: Option<PathBuf>, config: &GlobalConfig) -> Result<()> {
        let manifest = load_manifest(manifest_path).await?;
        let options = config.resolver_options(self.mode, self.max_iterations);
        let application = resolve_manifest(&manifest, options)?;

        let variants = self.variants.then(|| {
            VariantAttributeAssigner::assign(&manifest.project.name, options.launch_mode, &application)
        });
        let report = ResolveReport {
            project: &manifest.project.name,
            launch_mode: options.launch_mode,
            iterations: application.iterations,
            termination: application.termination,
            conditional: &application.satisfied,
            unsatisfied: &application.unsatisfied,
            excluded: &application.excluded,
            deployment: &application.deployment,
            variants,
        };

        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize resolution result")?;
                println!("{json}");
            }
            OutputFormat::Text => print!("{}", render_text(&report)),
        }
        Ok(())
    }
}

fn termination_label(termination: TerminationReason) -> &'static str {
    match termination {
        TerminationReason::Exhausted => "exhausted",
        TerminationReason::NoProgress => "no progress",
        TerminationReason::MaxIterations => "iteration limit reached",
    }
}

fn render_text(report: &ResolveReport<'_>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({}): {} pass(es), {}\n",
        report.project.bold(),
        report.launch_mode,
        report.iterations,
        termination_label(report.termination)
    ));

    out.push_str(&format!("\n{}\n", "Conditional dependencies:".bold()));
    if report.conditional.is_empty() {
        out.push_str("  (none)\n");
    }
    for (requester, satisfied) in report.conditional {
        out.push_str(&format!("  {}\n", requester.to_string().cyan()));
        for dependency in satisfied {
            let marker = if dependency.extension.is_some() {
                " (extension)"
            } else {
                ""
            };
            out.push_str(&format!("    + {}{}\n", dependency.artifact, marker));
        }
    }

    out.push_str(&format!("\n{}\n", "Deployment dependencies:".bold()));
    if report.deployment.direct.is_empty() {
        out.push_str("  (none)\n");
    }
    for dependency in &report.deployment.direct {
        out.push_str(&format!("  {} ({})\n", dependency.coords, dependency.extension));
    }
    for (module, dependencies) in &report.deployment.conditional {
        out.push_str(&format!("  {} {}\n", module.cyan(), "(conditional)".dimmed()));
        for dependency in dependencies {
            out.push_str(&format!("    + {}\n", dependency.coords));
        }
    }

    if !report.excluded.is_empty() {
        out.push_str(&format!("\n{}\n", "Excluded:".yellow()));
        for dependency in report.excluded {
            out.push_str(&format!("  {dependency}\n"));
        }
    }

    if !report.unsatisfied.is_empty() {
        out.push_str(&format!("\n{}\n", "Unsatisfied:".yellow()));
        for pending in report.unsatisfied {
            let requesters: Vec<String> =
                pending.requested_by.iter().map(ToString::to_string).collect();
            out.push_str(&format!(
                "  {} (requested by {})\n",
                pending.dependency,
                requesters.join(", ")
            ));
        }
    }

    if let Some(variants) = &report.variants {
        out.push_str(&format!(
            "\n{} {}\n",
            "Variants:".bold(),
            variants.configuration_name.dimmed()
        ));
        for variant in variants.conditional_variants.iter().chain(&variants.deployment_variants) {
            out.push_str(&format!(
                "  {} {}={}\n",
                variant.module.cyan(),
                variant.attribute,
                variants.attribute_value
            ));
            for dependency in &variant.dependencies {
                out.push_str(&format!("    + {dependency}\n"));
            }
        }
    }

    out
}

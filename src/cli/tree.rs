//! Display the resolved artifact graph.
//!
//! The graph includes every conditional dependency that was enabled.
//! Extension artifacts are tagged so it is easy to see where conditional
//! dependencies came from.
//!
//! # Examples
//!
//! ```bash
//! extdep tree
//! extdep tree --mode dev
//! extdep tree --format json
//! ```
//!
//! # Output Format
//!
//! ```text
//! my-app
//! └── io.quarkus:quarkus-rest:3.2.0 [extension]
//!     └── io.quarkus:quarkus-rest-jackson:3.2.0 [extension, conditional]
//! ```

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use super::common::{load_manifest, resolve_manifest};
use crate::config::GlobalConfig;
use crate::models::LaunchMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum TreeFormat {
    #[default]
    Tree,
    Json,
}

#[derive(Args, Debug)]
pub struct TreeCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t = TreeFormat::Tree)]
    format: TreeFormat,

    /// Launch mode used to enable conditional dependencies
    #[arg(long, value_enum)]
    mode: Option<LaunchMode>,
}

impl TreeCommand {
    pub async fn execute(self, manifest_path: Option<PathBuf>, config: &GlobalConfig) -> Result<()> {
        let manifest = load_manifest(manifest_path).await?;
        let options = config.resolver_options(self.mode, None);
        let application = resolve_manifest(&manifest, options)?;

        match self.format {
            TreeFormat::Tree => {
                println!("{}", manifest.project.name.bold());
                print!("{}", application.graph.to_tree_string());
                if application.graph.is_empty() {
                    println!("{}", "(no dependencies)".dimmed());
                }
            }
            TreeFormat::Json => {
                let json = serde_json::to_string_pretty(&application.graph.to_tree())
                    .context("Failed to serialize dependency tree")?;
                println!("{json}");
            }
        }
        Ok(())
    }
}

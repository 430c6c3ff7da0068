//! Command-line interface for extdep.
//!
//! # Commands
//!
//! - `resolve` - Enable conditional dependencies and derive deployment dependencies
//! - `tree` - Show the final artifact graph
//! - `descriptor` - Parse and show one extension descriptor
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug logging
//! - `--quiet` - Only log errors
//! - `--config <PATH>` - Global config file (default `~/.extdep/config.toml`)
//! - `--manifest-path <PATH>` - Manifest to use instead of searching for `extdep.toml`
//!
//! Without `--verbose` or `--quiet`, `RUST_LOG` is honored and defaults to `warn`.
//!
//! # Examples
//!
//! ```bash
//! extdep resolve --mode dev --variants
//! extdep --manifest-path ../app/extdep.toml tree --format json
//! extdep descriptor META-INF/quarkus-extension.properties
//! ```

mod common;
mod descriptor;
mod resolve;
mod tree;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::GlobalConfig;

/// Main CLI structure for extdep.
#[derive(Parser, Debug)]
#[command(
    name = "extdep",
    about = "Conditional and deployment dependency resolution for framework extensions",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the global configuration file.
    ///
    /// Defaults to `EXTDEP_CONFIG` or `~/.extdep/config.toml`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the manifest file (extdep.toml).
    ///
    /// By default extdep searches the current directory and its parents.
    #[arg(long, global = true)]
    manifest_path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve conditional and deployment dependencies
    Resolve(resolve::ResolveCommand),

    /// Display the resolved artifact graph
    Tree(tree::TreeCommand),

    /// Parse an extension descriptor
    Descriptor(descriptor::DescriptorCommand),
}

impl Cli {
    /// Set up logging, load the global config and run the subcommand.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        match self.command {
            Commands::Resolve(cmd) => {
                let config = GlobalConfig::load_with_optional(self.config).await?;
                cmd.execute(self.manifest_path, &config).await
            }
            Commands::Tree(cmd) => {
                let config = GlobalConfig::load_with_optional(self.config).await?;
                cmd.execute(self.manifest_path, &config).await
            }
            Commands::Descriptor(cmd) => cmd.execute().await,
        }
    }

    /// Log filter implied by the verbosity flags.
    fn log_filter(&self) -> EnvFilter {
        if self.verbose {
            EnvFilter::new("debug")
        } else if self.quiet {
            EnvFilter::new("error")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        }
    }

    fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

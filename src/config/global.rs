//! Global configuration file (`~/.extdep/config.toml`).
//!
//! ```toml
//! # Upper bound on conditional dependency passes
//! max_iterations = 100
//!
//! # normal | development | test
//! launch_mode = "normal"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{CONFIG_ENV_VAR, DEFAULT_MAX_ITERATIONS};
use crate::core::ExtdepError;
use crate::models::LaunchMode;
use crate::resolver::ResolverOptions;

/// User-wide resolution defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Upper bound on fixed-point passes.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Launch mode used when `--mode` is not given.
    #[serde(default)]
    pub launch_mode: LaunchMode,
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            launch_mode: LaunchMode::default(),
        }
    }
}

impl GlobalConfig {
    /// Load from the environment override or the default location.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load from `path` when given, otherwise from `EXTDEP_CONFIG` or the
    /// default location. A missing file yields the defaults.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => match std::env::var_os(CONFIG_ENV_VAR) {
                Some(value) => PathBuf::from(value),
                None => Self::default_path()?,
            },
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No global config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    /// Unreadable file, invalid TOML, or [`ExtdepError::ConfigError`] for an
    /// out of range value.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse global config from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// `~/.extdep/config.toml`, or `%LOCALAPPDATA%\extdep\config.toml` on Windows.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("extdep")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".extdep")
        };

        Ok(config_dir.join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(ExtdepError::ConfigError {
                message: "max_iterations must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Resolver options with command line overrides applied.
    pub fn resolver_options(
        &self,
        launch_mode: Option<LaunchMode>,
        max_iterations: Option<usize>,
    ) -> ResolverOptions {
        ResolverOptions {
            launch_mode: launch_mode.unwrap_or(self.launch_mode),
            max_iterations: max_iterations.unwrap_or(self.max_iterations),
        }
    }
}

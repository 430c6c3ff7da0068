//! Shared helpers for the test suites.

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A REST extension with one conditional dependency whose condition is met
/// by a transitive runtime dependency.
pub const REST_MANIFEST: &str = r#"
[project]
name = "app"
dependencies = ["org.acme:rest:1.0"]

[[component]]
coords = "org.acme:rest:1.0"
dependencies = ["org.acme:core:1.0"]

[component.extension]
deployment-artifact = "org.acme:rest-deployment"
conditional-dependencies = ["org.acme:rest-jackson"]

[[component]]
coords = "org.acme:core:1.0"

[[component]]
coords = "org.acme:rest-jackson:1.0"
dependencies = ["org.acme:jackson:1.0"]

[component.extension]
deployment-artifact = "org.acme:rest-jackson-deployment"
dependency-condition = ["org.acme:core"]

[[component]]
coords = "org.acme:jackson:1.0"
"#;

/// Temporary project directory with its own global config location.
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
    config_path: PathBuf,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        fs::create_dir_all(&project_dir)?;
        let config_path = temp_dir.path().join("config.toml");

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
            config_path,
        })
    }

    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir.join("extdep.toml")
    }

    /// Write `extdep.toml` into the project directory.
    pub fn write_manifest(&self, content: &str) -> Result<()> {
        let manifest_path = self.manifest_path();
        fs::write(&manifest_path, content)
            .with_context(|| format!("Failed to write manifest to {}", manifest_path.display()))
    }

    /// Write the global config used by [`TestProject::command`].
    pub fn write_config(&self, content: &str) -> Result<()> {
        fs::write(&self.config_path, content)
            .with_context(|| format!("Failed to write config to {}", self.config_path.display()))
    }

    /// Write a file relative to the project directory.
    pub fn write_file(&self, path: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.project_dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file_path, content)?;
        Ok(file_path)
    }

    /// `extdep` running in the project directory, isolated from the user's config.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("extdep").expect("extdep binary is built");
        cmd.current_dir(&self.project_dir)
            .env("EXTDEP_CONFIG", &self.config_path)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run `extdep` and capture its output.
    pub fn run_extdep(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(env!("CARGO_BIN_EXE_extdep"))
            .args(args)
            .current_dir(&self.project_dir)
            .env("EXTDEP_CONFIG", &self.config_path)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .output()
            .context("Failed to run extdep command")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Command output helper
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStderr: {}",
            self.code, self.stderr
        );
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
    }
}

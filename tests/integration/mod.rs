//! Integration test suite for extdep
//!
//! End-to-end tests that drive the `extdep` binary and the public library
//! API against manifests written to temporary directories.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **descriptor**: `descriptor` command
//! - **error_scenarios**: Exit codes and error messages
//! - **manifest_resolution**: Library-level resolution of loaded manifests
//! - **resolve**: `resolve` command output, modes and limits
//! - **tree**: `tree` command

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod descriptor;
mod error_scenarios;
mod manifest_resolution;
mod resolve;
mod tree;

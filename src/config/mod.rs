//! User configuration for extdep.
//!
//! Only the global configuration file exists; everything project specific
//! lives in the workspace manifest (see [`crate::manifest`]).
//!
//! # Location
//!
//! 1. `--config <PATH>` on the command line
//! 2. the `EXTDEP_CONFIG` environment variable
//! 3. `~/.extdep/config.toml` (`%LOCALAPPDATA%\extdep\config.toml` on Windows)
//!
//! A missing file means defaults. Command line flags override file values.

mod global;

pub use global::GlobalConfig;

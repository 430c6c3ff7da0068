//! Core types shared by every extdep module
//!
//! Currently this is the error system:
//! - [`ExtdepError`] - enumerated failure modes
//! - [`ErrorContext`] - user-facing wrapper with details and suggestions
//! - [`user_friendly_error`] - convert any [`anyhow::Error`] for CLI display

pub mod error;

pub use error::{ErrorContext, ExtdepError, user_friendly_error};

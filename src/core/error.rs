//! Error handling for extdep
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`ExtdepError`]) for precise handling in code
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions for CLI users
//!
//! Library code returns [`anyhow::Result`] and raises typed errors as
//! [`ExtdepError`], so callers can `downcast_ref` when they need to react to a
//! specific failure. [`user_friendly_error`] turns any error into an
//! [`ErrorContext`] for display.
//!
//! # Error Categories
//!
//! - **Resolution**: [`ExtdepError::UnresolvableDependency`], [`ExtdepError::ResolverFailure`]
//! - **Metadata**: [`ExtdepError::InvalidCoordinates`], [`ExtdepError::InvalidExtensionDescriptor`],
//!   [`ExtdepError::MetadataLookupFailed`]
//! - **Manifest**: [`ExtdepError::ManifestNotFound`], [`ExtdepError::ManifestParseError`],
//!   [`ExtdepError::ManifestValidationError`]
//! - **Configuration and I/O**: [`ExtdepError::ConfigError`], [`ExtdepError::IoError`],
//!   [`ExtdepError::TomlError`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use extdep_cli::core::{ExtdepError, user_friendly_error};
//!
//! let error = ExtdepError::UnresolvableDependency {
//!     coords: "org.acme:missing:1.0".to_string(),
//!     requested_by: vec!["org.acme:ext".to_string()],
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Every failure mode extdep reports.
#[derive(Error, Debug)]
pub enum ExtdepError {
    /// A conditional dependency resolved to no artifact and no exclusion rule covers it.
    ///
    /// Fatal: the whole resolution run is aborted.
    #[error("{coords} did not resolve to any artifacts")]
    UnresolvableDependency {
        /// The dependency as requested, after platform version alignment
        coords: String,
        /// Extensions that declared the dependency
        requested_by: Vec<String>,
    },

    /// Artifact coordinates could not be parsed
    #[error("Invalid artifact coordinates '{value}': {reason}")]
    InvalidCoordinates {
        /// The text that failed to parse
        value: String,
        /// What is wrong with it
        reason: String,
    },

    /// An extension descriptor is malformed or incomplete
    #[error("Invalid extension descriptor for {artifact}: {reason}")]
    InvalidExtensionDescriptor {
        /// Runtime artifact the descriptor belongs to (or the descriptor path)
        artifact: String,
        /// What is wrong with it
        reason: String,
    },

    /// The extension metadata source failed for an artifact
    #[error("Failed to read extension metadata of {artifact}: {reason}")]
    MetadataLookupFailed {
        artifact: String,
        reason: String,
    },

    /// The external dependency resolver reported a failure
    #[error("Dependency resolution failed for {request}: {reason}")]
    ResolverFailure {
        request: String,
        reason: String,
    },

    /// No manifest found
    #[error("Manifest file extdep.toml not found in current directory or any parent directory")]
    ManifestNotFound,

    /// Manifest could not be parsed
    #[error("Invalid manifest file syntax in {file}")]
    ManifestParseError {
        /// Path to the manifest
        file: String,
        /// Parser message
        reason: String,
    },

    /// Manifest parsed but is inconsistent
    #[error("Manifest validation failed: {reason}")]
    ManifestValidationError {
        reason: String,
    },

    /// Global configuration problem
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for ExtdepError {
    fn clone(&self) -> Self {
        match self {
            Self::UnresolvableDependency {
                coords,
                requested_by,
            } => Self::UnresolvableDependency {
                coords: coords.clone(),
                requested_by: requested_by.clone(),
            },
            Self::InvalidCoordinates {
                value,
                reason,
            } => Self::InvalidCoordinates {
                value: value.clone(),
                reason: reason.clone(),
            },
            Self::InvalidExtensionDescriptor {
                artifact,
                reason,
            } => Self::InvalidExtensionDescriptor {
                artifact: artifact.clone(),
                reason: reason.clone(),
            },
            Self::MetadataLookupFailed {
                artifact,
                reason,
            } => Self::MetadataLookupFailed {
                artifact: artifact.clone(),
                reason: reason.clone(),
            },
            Self::ResolverFailure {
                request,
                reason,
            } => Self::ResolverFailure {
                request: request.clone(),
                reason: reason.clone(),
            },
            Self::ManifestNotFound => Self::ManifestNotFound,
            Self::ManifestParseError {
                file,
                reason,
            } => Self::ManifestParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ManifestValidationError {
                reason,
            } => Self::ManifestValidationError {
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // io::Error is not Clone; keep its message
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::TomlError(e.clone()),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// An [`ExtdepError`] plus optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ExtdepError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: ExtdepError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion, shown in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details, shown in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`]
///
/// Recognizes [`ExtdepError`] anywhere in the chain (errors are often wrapped
/// with `anyhow::Context`), then [`std::io::Error`] and [`toml::de::Error`].
/// Anything else keeps its full cause chain in the message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    for cause in error.chain() {
        if let Some(extdep_error) = cause.downcast_ref::<ExtdepError>() {
            return create_error_context(extdep_error.clone());
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::NotFound {
            return ErrorContext::new(ExtdepError::Other {
                message: error.to_string(),
            })
            .with_suggestion("Check that the file or directory exists and the path is correct")
            .with_details("This error occurs when a required file or directory cannot be found");
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(ExtdepError::ManifestParseError {
            file: "extdep.toml".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and table headers")
        .with_details(toml_error.to_string());
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(ExtdepError::Other {
        message,
    })
}

fn create_error_context(error: ExtdepError) -> ErrorContext {
    match &error {
        ExtdepError::UnresolvableDependency {
            requested_by,
            ..
        } => {
            let details = if requested_by.is_empty() {
                "The dependency was requested as a conditional dependency".to_string()
            } else {
                format!("Requested as a conditional dependency by: {}", requested_by.join(", "))
            };
            ErrorContext::new(error)
                .with_suggestion(
                    "Make sure the artifact is available to the resolver, pin its version in the platform, or add an exclusion rule for it",
                )
                .with_details(details)
        }
        ExtdepError::InvalidCoordinates {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Use group:artifact:version, group:artifact:type:version or group:artifact:classifier:type:version",
        ),
        ExtdepError::InvalidExtensionDescriptor {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Every extension descriptor must declare 'deployment-artifact'")
            .with_details(
                "Descriptors are Java properties files (META-INF/quarkus-extension.properties)",
            ),
        ExtdepError::ManifestNotFound => ErrorContext::new(error)
            .with_suggestion("Create an extdep.toml file or pass --manifest-path")
            .with_details(
                "extdep looks for extdep.toml in the current directory and parent directories up to the filesystem root",
            ),
        ExtdepError::ManifestParseError {
            reason,
            ..
        } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and table headers")
                .with_details(reason)
        }
        ExtdepError::ManifestValidationError {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Every dependency must name a declared [[component]] and component coordinates must be unique",
        ),
        ExtdepError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check ~/.extdep/config.toml or the file passed with --config"),
        ExtdepError::ResolverFailure {
            ..
        }
        | ExtdepError::MetadataLookupFailed {
            ..
        } => ErrorContext::new(error).with_suggestion("Run again with --verbose for details"),
        _ => ErrorContext::new(error),
    }
}

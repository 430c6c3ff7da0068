//! Global constants used throughout the extdep codebase.
//!
//! Descriptor property names, file names and the default bounds applied by
//! the resolver live here so they are discoverable in one place.

/// Location of the extension descriptor inside a runtime artifact.
pub const EXTENSION_DESCRIPTOR_PATH: &str = "META-INF/quarkus-extension.properties";

/// Descriptor property naming the deployment artifact (required).
pub const PROP_DEPLOYMENT_ARTIFACT: &str = "deployment-artifact";

/// Descriptor property listing conditional dependencies.
pub const PROP_CONDITIONAL_DEPENDENCIES: &str = "conditional-dependencies";

/// Descriptor property listing development-mode conditional dependencies.
pub const PROP_CONDITIONAL_DEV_DEPENDENCIES: &str = "conditional-dev-dependencies";

/// Descriptor property listing the artifacts an extension needs before it is enabled.
pub const PROP_DEPENDENCY_CONDITION: &str = "dependency-condition";

/// Workspace manifest file name.
pub const MANIFEST_FILE_NAME: &str = "extdep.toml";

/// Default bound on fixed-point passes (100).
///
/// A chain of N conditional extensions needs N passes, so this is far above
/// anything observed in real applications.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Value set on conditional and deployment variant attributes.
pub const VARIANT_ATTRIBUTE_VALUE: &str = "on";

/// Environment variable pointing at an alternative global config file.
pub const CONFIG_ENV_VAR: &str = "EXTDEP_CONFIG";

//! Artifact identity and coordinates.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::core::ExtdepError;

/// Classifier of the main artifact of a module.
pub const DEFAULT_CLASSIFIER: &str = "";

/// Default artifact type.
pub const TYPE_JAR: &str = "jar";

/// Type of pom-only artifacts (relocations, BOMs).
pub const TYPE_POM: &str = "pom";

/// Identity of an artifact: `(group, artifactId, classifier, type)`.
///
/// Versions are deliberately not part of the key, so two versions of the same
/// artifact collapse onto one graph node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactKey {
    /// Group id, e.g. `io.quarkus`
    pub group_id: String,
    /// Artifact id, e.g. `quarkus-rest`
    pub artifact_id: String,
    /// Classifier, empty for the main artifact
    pub classifier: String,
    /// Artifact type (file extension), `jar` by default
    pub artifact_type: String,
}

impl ArtifactKey {
    /// Create a key from all four components.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        classifier: impl Into<String>,
        artifact_type: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier: classifier.into(),
            artifact_type: artifact_type.into(),
        }
    }

    /// Key of the main jar of `group:artifact`.
    pub fn ga(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self::new(group_id, artifact_id, DEFAULT_CLASSIFIER, TYPE_JAR)
    }

    /// Same group and artifact id, ignoring classifier and type.
    pub fn same_module(&self, group_id: &str, artifact_id: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id
    }

    /// `group:artifact` module name.
    pub fn module_name(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        let has_type = self.artifact_type != TYPE_JAR;
        if !self.classifier.is_empty() || has_type {
            write!(f, ":{}", self.classifier)?;
        }
        if has_type {
            write!(f, ":{}", self.artifact_type)?;
        }
        Ok(())
    }
}

impl FromStr for ArtifactKey {
    type Err = ExtdepError;

    /// Parse `group:artifact[:classifier[:type]]`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.trim().split(':').collect();
        let key = match parts.as_slice() {
            [g, a] => Self::ga(*g, *a),
            [g, a, c] => Self::new(*g, *a, *c, TYPE_JAR),
            [g, a, c, t] => {
                Self::new(*g, *a, *c, if t.is_empty() { TYPE_JAR } else { t })
            }
            _ => {
                return Err(invalid(value, "expected group:artifact[:classifier[:type]]"));
            }
        };
        check_required(value, &key.group_id, &key.artifact_id)?;
        Ok(key)
    }
}

/// Fully resolved coordinates of an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactCoords {
    /// Artifact identity
    pub key: ArtifactKey,
    /// Resolved version
    pub version: String,
}

impl ArtifactCoords {
    /// Create coordinates from a key and a version.
    pub fn new(key: ArtifactKey, version: impl Into<String>) -> Self {
        Self {
            key,
            version: version.into(),
        }
    }

    /// Coordinates of the main jar of `group:artifact:version`.
    pub fn jar(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self::new(ArtifactKey::ga(group_id, artifact_id), version)
    }

    /// Shortcut for the group id.
    pub fn group_id(&self) -> &str {
        &self.key.group_id
    }

    /// Shortcut for the artifact id.
    pub fn artifact_id(&self) -> &str {
        &self.key.artifact_id
    }

    /// Shortcut for the artifact type.
    pub fn artifact_type(&self) -> &str {
        &self.key.artifact_type
    }

    /// Whether this is a pom-only artifact.
    pub fn is_pom(&self) -> bool {
        self.key.artifact_type == TYPE_POM
    }

    /// Parseable `group:artifact[[:classifier]:type]:version` form.
    pub fn to_gactv_string(&self) -> String {
        let key = &self.key;
        if !key.classifier.is_empty() {
            format!(
                "{}:{}:{}:{}:{}",
                key.group_id, key.artifact_id, key.classifier, key.artifact_type, self.version
            )
        } else if key.artifact_type != TYPE_JAR {
            format!("{}:{}:{}:{}", key.group_id, key.artifact_id, key.artifact_type, self.version)
        } else {
            format!("{}:{}:{}", key.group_id, key.artifact_id, self.version)
        }
    }
}

impl fmt::Display for ArtifactCoords {
    /// Diagnostic form `group:artifact:version[:classifier][@type]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.key.group_id, self.key.artifact_id, self.version)?;
        if !self.key.classifier.is_empty() {
            write!(f, ":{}", self.key.classifier)?;
        }
        if self.key.artifact_type != TYPE_JAR {
            write!(f, "@{}", self.key.artifact_type)?;
        }
        Ok(())
    }
}

impl FromStr for ArtifactCoords {
    type Err = ExtdepError;

    /// Parse `g:a:v`, `g:a:type:v` or `g:a:classifier:type:v`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.trim().split(':').collect();
        let (key, version) = match parts.as_slice() {
            [g, a, v] => (ArtifactKey::ga(*g, *a), *v),
            [g, a, t, v] => (ArtifactKey::new(*g, *a, DEFAULT_CLASSIFIER, *t), *v),
            [g, a, c, t, v] => (ArtifactKey::new(*g, *a, *c, *t), *v),
            _ => {
                return Err(invalid(value, "expected group:artifact[[:classifier]:type]:version"));
            }
        };
        check_required(value, &key.group_id, &key.artifact_id)?;
        if version.is_empty() {
            return Err(invalid(value, "version is empty"));
        }
        let mut key = key;
        if key.artifact_type.is_empty() {
            key.artifact_type = TYPE_JAR.to_string();
        }
        Ok(Self::new(key, version))
    }
}

impl Serialize for ArtifactKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ArtifactKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for ArtifactCoords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_gactv_string())
    }
}

impl<'de> Deserialize<'de> for ArtifactCoords {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

fn invalid(value: &str, reason: &str) -> ExtdepError {
    ExtdepError::InvalidCoordinates {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn check_required(value: &str, group_id: &str, artifact_id: &str) -> Result<(), ExtdepError> {
    if group_id.is_empty() || artifact_id.is_empty() {
        return Err(invalid(value, "group and artifact id must not be empty"));
    }
    Ok(())
}

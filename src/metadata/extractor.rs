//! Extract extension metadata from descriptor files.
//!
//! Descriptors are Java properties documents. Only the handful of keys the
//! resolver needs are interpreted; everything else is ignored.

use anyhow::Result;
use std::collections::BTreeMap;

use super::ExtensionDescriptor;
use crate::constants::{
    PROP_CONDITIONAL_DEPENDENCIES, PROP_CONDITIONAL_DEV_DEPENDENCIES, PROP_DEPENDENCY_CONDITION,
    PROP_DEPLOYMENT_ARTIFACT,
};
use crate::core::ExtdepError;
use crate::models::{ArtifactCoords, ArtifactKey, DependencyRef};

/// Metadata extractor for extension descriptors.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Parse a descriptor belonging to `runtime`.
    ///
    /// # Errors
    /// [`ExtdepError::InvalidExtensionDescriptor`] when `deployment-artifact`
    /// is missing or any listed coordinate is malformed.
    pub fn extract(runtime: &ArtifactCoords, content: &str) -> Result<ExtensionDescriptor> {
        let properties = Self::parse_properties(content);
        Self::from_properties(runtime, &properties)
    }

    /// Build a descriptor from already parsed properties.
    pub fn from_properties(
        runtime: &ArtifactCoords,
        properties: &BTreeMap<String, String>,
    ) -> Result<ExtensionDescriptor> {
        let invalid = |reason: String| ExtdepError::InvalidExtensionDescriptor {
            artifact: runtime.to_string(),
            reason,
        };

        let deployment = properties
            .get(PROP_DEPLOYMENT_ARTIFACT)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| invalid(format!("missing '{PROP_DEPLOYMENT_ARTIFACT}'")))?;
        let deployment = Self::deployment_coords(runtime, deployment)
            .map_err(|e| invalid(format!("'{PROP_DEPLOYMENT_ARTIFACT}': {e}")))?;

        let mut descriptor = ExtensionDescriptor::new(runtime.clone(), deployment);
        descriptor.conditional_dependencies =
            Self::parse_list(properties, PROP_CONDITIONAL_DEPENDENCIES).map_err(invalid)?;
        descriptor.conditional_dev_dependencies =
            Self::parse_list(properties, PROP_CONDITIONAL_DEV_DEPENDENCIES).map_err(invalid)?;
        descriptor.dependency_conditions =
            Self::parse_list(properties, PROP_DEPENDENCY_CONDITION).map_err(invalid)?;
        Ok(descriptor)
    }

    /// Deployment coordinates, defaulting the version to the runtime's.
    pub fn deployment_coords(
        runtime: &ArtifactCoords,
        value: &str,
    ) -> Result<ArtifactCoords, ExtdepError> {
        if value.split(':').count() == 2 {
            let key: ArtifactKey = value.parse()?;
            return Ok(ArtifactCoords::new(key, runtime.version.clone()));
        }
        value.parse()
    }

    fn parse_list<T>(properties: &BTreeMap<String, String>, name: &str) -> Result<Vec<T>, String>
    where
        T: std::str::FromStr<Err = ExtdepError>,
    {
        let Some(value) = properties.get(name) else {
            return Ok(Vec::new());
        };
        value
            .split_whitespace()
            .map(|item| item.parse::<T>().map_err(|e| format!("'{name}': {e}")))
            .collect()
    }

    /// Parse a Java properties document.
    ///
    /// Supports `key=value`, `key:value` and `key value` separators, `#` and
    /// `!` comment lines, backslash line continuation and the common escapes.
    /// A repeated key keeps its last value.
    pub fn parse_properties(content: &str) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        let mut lines = content.lines();

        while let Some(line) = lines.next() {
            let mut logical = line.trim_start().to_string();
            if logical.is_empty() || logical.starts_with('#') || logical.starts_with('!') {
                continue;
            }
            while ends_with_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (key, value) = split_key_value(&logical);
            properties.insert(unescape(key), unescape(value));
        }

        properties
    }
}

/// Odd number of trailing backslashes.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\u{c}' => {
                key_end = idx;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches([' ', '\t', '\u{c}']);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches([' ', '\t', '\u{c}']);
    }
    (key, rest)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

//! Platform (BOM) constraints applied to every conditional resolution.
//!
//! A platform pins versions for `group:artifact` pairs and carries exclusion
//! rules. Exclusion rules use glob patterns for the group and the module
//! name; an absent pattern matches anything.

use anyhow::{Context, Result};
use glob::Pattern;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::DependencyRef;

/// Source of platform version constraints and exclusion rules.
pub trait PlatformConstraints {
    /// Version enforced for `group:artifact_id`, if any.
    fn find_constraint(&self, group: &str, artifact_id: &str) -> Option<String>;

    /// Exclusion rules of the enclosing dependency set.
    fn exclusion_rules(&self) -> &[ExclusionRule];

    /// Whether any exclusion rule matches `dep`.
    fn is_excluded(&self, dep: &DependencyRef) -> bool {
        self.exclusion_rules().iter().any(|rule| rule.matches(&dep.group_id, &dep.artifact_id))
    }
}

/// A `(group?, module?)` exclusion pattern pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawExclusionRule")]
pub struct ExclusionRule {
    group: Option<Pattern>,
    module: Option<Pattern>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawExclusionRule {
    group: Option<String>,
    module: Option<String>,
}

impl TryFrom<RawExclusionRule> for ExclusionRule {
    type Error = anyhow::Error;

    fn try_from(raw: RawExclusionRule) -> Result<Self> {
        Self::new(raw.group.as_deref(), raw.module.as_deref())
    }
}

impl ExclusionRule {
    /// Compile a rule; `None` means "any".
    pub fn new(group: Option<&str>, module: Option<&str>) -> Result<Self> {
        let compile = |pattern: Option<&str>| -> Result<Option<Pattern>> {
            pattern
                .map(|p| {
                    Pattern::new(p).with_context(|| format!("Invalid exclusion pattern: {p}"))
                })
                .transpose()
        };
        Ok(Self {
            group: compile(group)?,
            module: compile(module)?,
        })
    }

    /// Group pattern matches (or is absent) and module pattern matches (or is absent).
    pub fn matches(&self, group: &str, module: &str) -> bool {
        let group_ok = self.group.as_ref().is_none_or(|p| p.matches(group));
        let module_ok = self.module.as_ref().is_none_or(|p| p.matches(module));
        group_ok && module_ok
    }
}

impl fmt::Display for ExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group = self.group.as_ref().map_or("*", Pattern::as_str);
        let module = self.module.as_ref().map_or("*", Pattern::as_str);
        write!(f, "{group}:{module}")
    }
}

/// Platform declared in a workspace manifest.
///
/// ```toml
/// [platform.constraints]
/// "io.quarkus:quarkus-jackson" = "3.2.1"
///
/// [[platform.exclusions]]
/// group = "org.unwanted"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformSpec {
    /// Enforced versions keyed by `group:artifact`
    #[serde(default)]
    pub constraints: BTreeMap<String, String>,
    #[serde(default)]
    pub exclusions: Vec<ExclusionRule>,
}

impl PlatformSpec {
    pub fn with_constraint(
        mut self,
        group: &str,
        artifact_id: &str,
        version: impl Into<String>,
    ) -> Self {
        self.constraints.insert(format!("{group}:{artifact_id}"), version.into());
        self
    }

    pub fn with_exclusion(mut self, rule: ExclusionRule) -> Self {
        self.exclusions.push(rule);
        self
    }
}

impl PlatformConstraints for PlatformSpec {
    fn find_constraint(&self, group: &str, artifact_id: &str) -> Option<String> {
        self.constraints.get(&format!("{group}:{artifact_id}")).cloned()
    }

    fn exclusion_rules(&self) -> &[ExclusionRule] {
        &self.exclusions
    }
}

//! Core types for the drift engine: rules and the drifts they produce.

use std::fmt;

use confdrift_core::constants::ALL_ENVIRONMENTS;
use confdrift_core::ConfigValue;
use serde::{Deserialize, Serialize};

/// Whether a key may legitimately differ from the declared baseline at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangePolicy {
    /// Changes only through the declared baseline (version control + CI).
    CiOnly,
    /// Runtime overrides are acceptable.
    #[default]
    RuntimeAllowed,
}

impl ChangePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CiOnly => "CI_ONLY",
            Self::RuntimeAllowed => "RUNTIME_ALLOWED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CI_ONLY" => Some(Self::CiOnly),
            "RUNTIME_ALLOWED" => Some(Self::RuntimeAllowed),
            _ => None,
        }
    }
}

impl fmt::Display for ChangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A policy statement bound to a key pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Exact key or wildcard pattern (`payment.*`).
    pub key: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_allowed_in_prod")]
    pub allowed_in_prod: bool,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub change_policy: ChangePolicy,
    /// `"*"` or one environment name, matched case-sensitively.
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_allowed_in_prod() -> bool {
    true
}

fn default_environment() -> String {
    ALL_ENVIRONMENTS.to_string()
}

impl Rule {
    /// A rule for `key` with permissive defaults: optional, allowed in
    /// production, unbounded, runtime changes allowed, all environments.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            required: false,
            allowed_in_prod: true,
            min_value: None,
            max_value: None,
            change_policy: ChangePolicy::RuntimeAllowed,
            environment: default_environment(),
        }
    }

    pub fn require(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn deny_in_prod(mut self) -> Self {
        self.allowed_in_prod = false;
        self
    }

    pub fn min(mut self, value: f64) -> Self {
        self.min_value = Some(value);
        self
    }

    pub fn max(mut self, value: f64) -> Self {
        self.max_value = Some(value);
        self
    }

    pub fn ci_only(mut self) -> Self {
        self.change_policy = ChangePolicy::CiOnly;
        self
    }

    pub fn policy(mut self, policy: ChangePolicy) -> Self {
        self.change_policy = policy;
        self
    }

    pub fn in_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Exact, case-sensitive environment scoping.
    pub fn applies_to(&self, environment: &str) -> bool {
        self.environment == ALL_ENVIRONMENTS || self.environment == environment
    }

    pub fn has_bounds(&self) -> bool {
        self.min_value.is_some() || self.max_value.is_some()
    }
}

/// Kind of discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftType {
    /// A required key is absent at runtime.
    Missing,
    /// A runtime value diverges from the baseline under a CI-only policy.
    Overridden,
    /// A value violates a production restriction or numeric bound.
    Unsafe,
}

impl DriftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "MISSING",
            Self::Overridden => "OVERRIDDEN",
            Self::Unsafe => "UNSAFE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MISSING" => Some(Self::Missing),
            "OVERRIDDEN" => Some(Self::Overridden),
            "UNSAFE" => Some(Self::Unsafe),
            _ => None,
        }
    }
}

impl fmt::Display for DriftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drift severity. Fixed per detector sub-case, never configured per rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding. Produced fresh on every detection pass; identity and
/// deduplication belong to whoever persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drift {
    #[serde(rename = "type")]
    pub drift_type: DriftType,
    pub severity: Severity,
    pub config_key: String,
    pub expected_value: ConfigValue,
    pub actual_value: ConfigValue,
    pub explanation: String,
    /// Pattern of the rule that produced this drift.
    pub rule_key: String,
}

//! Drift aggregation: runs the detectors in a fixed order.

use confdrift_core::errors::DetectionError;
use confdrift_core::ConfigMap;

use crate::detectors::{detect_missing, detect_overridden, detect_unsafe};
use crate::policy::DetectionPolicy;
use crate::selector::RuleSet;
use crate::types::{Drift, Rule};

/// Reusable detector over a precompiled rule set.
///
/// Output order is MISSING drifts (rule order), then OVERRIDDEN, then UNSAFE
/// (both in runtime-key order). Nothing is deduplicated across detectors.
#[derive(Debug, Clone, Default)]
pub struct DriftDetector {
    rules: RuleSet,
    policy: DetectionPolicy,
}

impl DriftDetector {
    pub fn new(rules: RuleSet, policy: DetectionPolicy) -> Self {
        Self { rules, policy }
    }

    /// Compile `rules` and use the default policy.
    pub fn from_rules<I>(rules: I) -> Result<Self, DetectionError>
    where
        I: IntoIterator<Item = Rule>,
    {
        Ok(Self::new(RuleSet::compile(rules)?, DetectionPolicy::default()))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn policy(&self) -> &DetectionPolicy {
        &self.policy
    }

    /// Compare `declared` against `runtime` for `environment`. An absent map
    /// is passed as an empty one.
    pub fn detect(&self, declared: &ConfigMap, runtime: &ConfigMap, environment: &str) -> Vec<Drift> {
        let applicable = self.rules.applicable(environment);

        let mut drifts = detect_missing(runtime, &applicable);
        drifts.extend(detect_overridden(declared, runtime, &applicable));
        drifts.extend(detect_unsafe(runtime, &applicable, environment, &self.policy));

        tracing::debug!(
            environment,
            applicable_rules = applicable.len(),
            runtime_keys = runtime.len(),
            drifts = drifts.len(),
            "drift detection complete"
        );
        drifts
    }
}

/// One-shot detection: compile `rules`, detect with the default policy.
pub fn detect_drift(
    declared: &ConfigMap,
    runtime: &ConfigMap,
    rules: &[Rule],
    environment: &str,
) -> Result<Vec<Drift>, DetectionError> {
    let detector = DriftDetector::from_rules(rules.iter().cloned())?;
    Ok(detector.detect(declared, runtime, environment))
}

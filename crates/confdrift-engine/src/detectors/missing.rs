//! Required keys absent from the runtime configuration.

use confdrift_core::{ConfigMap, ConfigValue};

use crate::selector::CompiledRule;
use crate::types::{Drift, DriftType, Severity};

/// One HIGH drift per required rule that no runtime key satisfies.
/// Emitted in rule order; `config_key` is the rule pattern itself.
pub fn detect_missing(runtime: &ConfigMap, rules: &[&CompiledRule]) -> Vec<Drift> {
    rules
        .iter()
        .filter(|c| c.rule.required)
        .filter(|c| !runtime.keys().any(|key| c.matches(key)))
        .map(|c| Drift {
            drift_type: DriftType::Missing,
            severity: Severity::High,
            config_key: c.rule.key.clone(),
            expected_value: ConfigValue::from("(required)"),
            actual_value: ConfigValue::Null,
            explanation: format!(
                "Required configuration key \"{}\" is missing from runtime configuration",
                c.rule.key
            ),
            rule_key: c.rule.key.clone(),
        })
        .collect()
}

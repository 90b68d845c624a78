//! Production restrictions and numeric bounds.

use confdrift_core::{ConfigMap, ConfigValue};

use crate::numeric::parse_numeric;
use crate::policy::DetectionPolicy;
use crate::selector::{find_rule, CompiledRule};
use crate::types::{Drift, DriftType, Severity};

/// Values that count as "turned off" for a restricted key. `Number(0)` is
/// not one of them; only the string `"0"` is.
fn is_disabled(value: &ConfigValue) -> bool {
    match value {
        ConfigValue::Null | ConfigValue::Bool(false) => true,
        ConfigValue::String(s) => s == "false" || s == "0",
        _ => false,
    }
}

fn format_number(n: f64) -> String {
    ConfigValue::Number(n).to_string()
}

/// For each runtime key with a governing rule, in order: a CRITICAL drift
/// when the rule is disallowed in a restricted environment and the value is
/// not disabled, then HIGH drifts for a minimum and a maximum violation.
pub fn detect_unsafe(
    runtime: &ConfigMap,
    rules: &[&CompiledRule],
    environment: &str,
    policy: &DetectionPolicy,
) -> Vec<Drift> {
    let restricted = policy.is_restricted(environment);
    runtime
        .iter()
        .filter_map(|(key, value)| find_rule(key, rules).map(|c| (key, value, c)))
        .flat_map(|(key, value, governing)| {
            let rule = &governing.rule;
            let unsafe_drift = |expected_value: ConfigValue, severity, explanation| Drift {
                drift_type: DriftType::Unsafe,
                severity,
                config_key: key.clone(),
                expected_value,
                actual_value: value.clone(),
                explanation,
                rule_key: rule.key.clone(),
            };

            let prod = (restricted && !rule.allowed_in_prod && !is_disabled(value)).then(|| {
                unsafe_drift(
                    ConfigValue::from("(not allowed in production)"),
                    Severity::Critical,
                    format!(
                        "Configuration \"{key}\" is not allowed in production environment. Current value: \"{value}\""
                    ),
                )
            });

            let number = if rule.has_bounds() {
                parse_numeric(value)
            } else {
                None
            };
            let below = number
                .zip(rule.min_value)
                .filter(|(n, min)| n < min)
                .map(|(n, min)| {
                    unsafe_drift(
                        ConfigValue::String(format!("min: {}", format_number(min))),
                        Severity::High,
                        format!(
                            "Configuration \"{key}\" has value {} which is below the minimum allowed value of {}",
                            format_number(n),
                            format_number(min)
                        ),
                    )
                });
            let above = number
                .zip(rule.max_value)
                .filter(|(n, max)| n > max)
                .map(|(n, max)| {
                    unsafe_drift(
                        ConfigValue::String(format!("max: {}", format_number(max))),
                        Severity::High,
                        format!(
                            "Configuration \"{key}\" has value {} which exceeds the maximum allowed value of {}",
                            format_number(n),
                            format_number(max)
                        ),
                    )
                });

            prod.into_iter().chain(below).chain(above)
        })
        .collect()
}

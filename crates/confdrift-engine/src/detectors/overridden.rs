//! Runtime values diverging from the baseline under a CI-only policy.

use confdrift_core::{ConfigMap, ConfigValue};

use crate::selector::{find_rule, CompiledRule};
use crate::types::{ChangePolicy, Drift, DriftType, Severity};

/// MEDIUM drift for every runtime key governed by a CI-only rule that is
/// either absent from the baseline or whose string form differs from it.
pub fn detect_overridden(
    declared: &ConfigMap,
    runtime: &ConfigMap,
    rules: &[&CompiledRule],
) -> Vec<Drift> {
    runtime
        .iter()
        .filter_map(|(key, runtime_value)| {
            let governing = find_rule(key, rules)?;
            if governing.rule.change_policy != ChangePolicy::CiOnly {
                return None;
            }
            let (expected_value, explanation) = match declared.get(key) {
                None => (
                    ConfigValue::Null,
                    format!(
                        "Runtime override detected: \"{key}\" is not in declared configuration but is present at runtime"
                    ),
                ),
                Some(declared_value) => {
                    let (decl, rt) = (declared_value.to_string(), runtime_value.to_string());
                    if decl == rt {
                        return None;
                    }
                    (
                        declared_value.clone(),
                        format!(
                            "Runtime override detected: \"{key}\" has value \"{rt}\" but declared value is \"{decl}\""
                        ),
                    )
                }
            };
            Some(Drift {
                drift_type: DriftType::Overridden,
                severity: Severity::Medium,
                config_key: key.clone(),
                expected_value,
                actual_value: runtime_value.clone(),
                explanation,
                rule_key: governing.rule.key.clone(),
            })
        })
        .collect()
}

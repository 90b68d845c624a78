//! Declared baselines: nested YAML/JSON documents flattened into
//! dot-notation keys.
//!
//! ```yaml
//! server:
//!   port: 8080
//! ```
//! becomes `server.port = 8080`. Sequences and nulls are leaves; a sequence
//! is kept as its JSON text. Empty nested mappings contribute no keys.

use confdrift_core::errors::BaselineError;
use confdrift_core::{ConfigMap, ConfigValue};
use serde_yaml::{Mapping, Value};

/// Parse a YAML document and flatten it.
pub fn parse_yaml(document: &str) -> Result<ConfigMap, BaselineError> {
    let root: Value = serde_yaml::from_str(document).map_err(|e| BaselineError::Parse {
        message: e.to_string(),
    })?;
    match untag(&root) {
        Value::Mapping(mapping) => {
            let mut out = ConfigMap::new();
            flatten_mapping(mapping, "", &mut out);
            Ok(out)
        }
        other => Err(BaselineError::InvalidRoot {
            found: yaml_kind(other).to_string(),
        }),
    }
}

/// Flatten a JSON object the same way.
pub fn flatten_json(value: &serde_json::Value) -> Result<ConfigMap, BaselineError> {
    match value {
        serde_json::Value::Object(object) => {
            let mut out = ConfigMap::new();
            flatten_object(object, "", &mut out);
            Ok(out)
        }
        other => Err(BaselineError::InvalidRoot {
            found: json_kind(other).to_string(),
        }),
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn flatten_mapping(mapping: &Mapping, prefix: &str, out: &mut ConfigMap) {
    for (key, value) in mapping {
        let full_key = join(prefix, &yaml_key(key));
        match untag(value) {
            Value::Mapping(nested) => flatten_mapping(nested, &full_key, out),
            leaf => {
                out.insert(full_key, yaml_leaf(leaf));
            }
        }
    }
}

fn flatten_object(
    object: &serde_json::Map<String, serde_json::Value>,
    prefix: &str,
    out: &mut ConfigMap,
) {
    for (key, value) in object {
        let full_key = join(prefix, key);
        match value {
            serde_json::Value::Object(nested) => flatten_object(nested, &full_key, out),
            leaf => {
                out.insert(full_key, ConfigValue::from_json(leaf));
            }
        }
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn yaml_key(key: &Value) -> String {
    match untag(key) {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => json_text(other),
    }
}

fn yaml_leaf(value: &Value) -> ConfigValue {
    match value {
        Value::Null => ConfigValue::Null,
        Value::Bool(b) => ConfigValue::Bool(*b),
        Value::Number(n) => n
            .as_f64()
            .map(ConfigValue::Number)
            .unwrap_or_else(|| ConfigValue::String(n.to_string())),
        Value::String(s) => ConfigValue::String(s.clone()),
        other => ConfigValue::String(json_text(other)),
    }
}

/// JSON text of a non-scalar value; YAML text when the value has no JSON
/// form (non-string mapping keys).
fn json_text(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| {
        serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default()
    })
}

fn yaml_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

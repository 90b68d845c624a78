//! Conversions between engine/service types and storage rows.

use confdrift_core::errors::StorageError;
use confdrift_core::{ConfigMap, ConfigValue};
use confdrift_engine::{ChangePolicy, Drift, DriftType, Rule, Severity};
use confdrift_storage::queries::drifts::{DriftListRow, DriftRow, DriftStatus};
use confdrift_storage::queries::rules::RuleRow;

use crate::api::{DriftRecord, StoredRule};

fn corrupt(what: &str, message: impl Into<String>) -> StorageError {
    StorageError::Serialization {
        what: what.to_string(),
        message: message.into(),
    }
}

/// JSON text of a config map, for the baseline and snapshot columns.
pub fn encode_map(map: &ConfigMap) -> Result<String, StorageError> {
    serde_json::to_string(map).map_err(|e| corrupt("config map", e.to_string()))
}

pub fn decode_map(json: Option<&str>) -> Result<ConfigMap, StorageError> {
    match json {
        None => Ok(ConfigMap::new()),
        Some(text) => serde_json::from_str(text).map_err(|e| corrupt("config map", e.to_string())),
    }
}

/// Null is stored as SQL NULL, anything else as JSON.
fn encode_value(value: &ConfigValue) -> Result<Option<String>, StorageError> {
    if value.is_null() {
        return Ok(None);
    }
    serde_json::to_string(value)
        .map(Some)
        .map_err(|e| corrupt("drift value", e.to_string()))
}

fn decode_value(text: Option<&str>) -> Result<ConfigValue, StorageError> {
    match text {
        None => Ok(ConfigValue::Null),
        Some(t) => serde_json::from_str(t).map_err(|e| corrupt("drift value", e.to_string())),
    }
}

/// A freshly detected drift as a new `ACTIVE` row.
pub fn drift_to_row(
    drift: &Drift,
    id: String,
    application_id: &str,
    detected_at: &str,
) -> Result<DriftRow, StorageError> {
    Ok(DriftRow {
        id,
        application_id: application_id.to_string(),
        config_key: drift.config_key.clone(),
        expected_value: encode_value(&drift.expected_value)?,
        actual_value: encode_value(&drift.actual_value)?,
        drift_type: drift.drift_type.as_str().to_string(),
        severity: drift.severity.as_str().to_string(),
        rule_key: Some(drift.rule_key.clone()),
        first_detected_at: detected_at.to_string(),
        status: DriftStatus::Active.as_str().to_string(),
        acknowledged_at: None,
        resolved_at: None,
        description: Some(drift.explanation.clone()),
    })
}

pub fn row_to_record(listed: DriftListRow) -> Result<DriftRecord, StorageError> {
    let DriftListRow {
        application_name,
        drift: row,
    } = listed;
    Ok(DriftRecord {
        expected_value: decode_value(row.expected_value.as_deref())?,
        actual_value: decode_value(row.actual_value.as_deref())?,
        drift_type: DriftType::parse(&row.drift_type)
            .ok_or_else(|| corrupt("drift type", row.drift_type.clone()))?,
        severity: Severity::parse(&row.severity)
            .ok_or_else(|| corrupt("severity", row.severity.clone()))?,
        id: row.id,
        application_name,
        config_key: row.config_key,
        rule_key: row.rule_key,
        first_detected_at: row.first_detected_at,
        status: row.status,
        acknowledged_at: row.acknowledged_at,
        resolved_at: row.resolved_at,
        description: row.description,
    })
}

pub fn rule_to_row(rule: &Rule, id: String) -> RuleRow {
    RuleRow {
        id,
        position: 0,
        config_key: rule.key.clone(),
        required: rule.required,
        allowed_in_prod: rule.allowed_in_prod,
        min_value: rule.min_value,
        max_value: rule.max_value,
        change_policy: rule.change_policy.as_str().to_string(),
        environment: rule.environment.clone(),
    }
}

pub fn row_to_rule(row: RuleRow) -> Result<StoredRule, StorageError> {
    let change_policy = ChangePolicy::parse(&row.change_policy)
        .ok_or_else(|| corrupt("change policy", row.change_policy.clone()))?;
    Ok(StoredRule {
        id: row.id,
        position: row.position,
        rule: Rule {
            key: row.config_key,
            required: row.required,
            allowed_in_prod: row.allowed_in_prod,
            min_value: row.min_value,
            max_value: row.max_value,
            change_policy,
            environment: row.environment,
        },
    })
}

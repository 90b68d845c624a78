//! Request and response shapes of the monitor service. Field names are
//! camelCase on the wire.

use std::collections::BTreeMap;

use confdrift_core::{ConfigMap, ConfigValue};
use confdrift_engine::{DriftType, Rule, Severity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterBaselineRequest {
    pub application_name: String,
    pub environment: String,
    pub yaml_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineRegistered {
    pub application_id: String,
    /// Number of flattened keys in the stored baseline.
    pub config_keys: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotRequest {
    pub application_name: String,
    pub environment: String,
    pub config: Option<ConfigMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_stats: Option<BTreeMap<String, u64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotReceived {
    pub snapshot_id: String,
    /// Drifts found in this snapshot.
    pub drifts_detected: usize,
    /// Drifts newly recorded; the rest were already open for their key.
    pub drifts_recorded: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriftQuery {
    pub application_name: Option<String>,
    /// Status name, any case.
    pub status: Option<String>,
}

/// A persisted drift as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftRecord {
    pub id: String,
    pub application_name: String,
    pub config_key: String,
    pub expected_value: ConfigValue,
    pub actual_value: ConfigValue,
    pub drift_type: DriftType,
    pub severity: Severity,
    pub rule_key: Option<String>,
    pub first_detected_at: String,
    pub status: String,
    pub acknowledged_at: Option<String>,
    pub resolved_at: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CiStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CiDriftSummary {
    pub key: String,
    #[serde(rename = "type")]
    pub drift_type: DriftType,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiCheckResult {
    pub status: CiStatus,
    pub message: String,
    pub drift_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drifts: Vec<CiDriftSummary>,
}

impl CiCheckResult {
    pub fn passed(&self) -> bool {
        self.status == CiStatus::Pass
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigComparison {
    pub application_name: String,
    pub environment: String,
    pub baseline_config: ConfigMap,
    pub runtime_config: ConfigMap,
    pub snapshot_timestamp: Option<String>,
}

/// A rule together with its storage identity and precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRule {
    pub id: String,
    pub position: i64,
    #[serde(flatten)]
    pub rule: Rule,
}
